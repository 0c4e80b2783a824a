use agro_report::analyzer::AnalysisOrchestrator;
use agro_report::config::{AppConfig, load_config};
use agro_report::report::{AssetLoader, ReportGenerator, ReportRequest, ReportStyle};
use agro_report::storage::SqliteStorage;
use clap::Parser;
use futures::future::join_all;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "agro-report", version, about = "Satellite vegetation-index reports for agricultural parcels")]
struct Cli {
    #[arg(long, default_value = "config.json", help = "Path to the JSON config file")]
    config: PathBuf,
    #[arg(long = "parcel", required = true, help = "Parcel id to report on (repeatable)")]
    parcels: Vec<i64>,
    #[arg(long, help = "Lookback period in months (defaults to config)")]
    months: Option<u32>,
    #[arg(long, help = "Output file, only valid with a single parcel")]
    output: Option<PathBuf>,
    #[arg(long, help = "SQLite database path (overrides config)")]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load error ({}), using defaults", e);
            AppConfig::default()
        }
    };

    if cli.output.is_some() && cli.parcels.len() > 1 {
        error!("--output can only be used with a single --parcel");
        return ExitCode::FAILURE;
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path.clone());
    let storage = match SqliteStorage::new(&db_path.to_string_lossy()) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let generator = ReportGenerator::new(
        storage,
        Arc::new(AnalysisOrchestrator::baseline()),
        Arc::new(ReportStyle::from_config(&config.report)),
        Arc::new(AssetLoader::new(config.branding.clone())),
        config.output_dir.clone(),
    );
    let months = cli.months.unwrap_or(config.default_months);
    info!("Generating {} report(s) over the last {} months", cli.parcels.len(), months);

    let tasks: Vec<_> = cli
        .parcels
        .iter()
        .map(|parcel_id| {
            let generator = generator.clone();
            let request = ReportRequest {
                parcel_id: *parcel_id,
                months,
                output: cli.output.clone(),
            };
            tokio::spawn(async move {
                let result = generator.generate(&request).await;
                (request.parcel_id, result)
            })
        })
        .collect();

    let mut failures = 0;
    for joined in join_all(tasks).await {
        match joined {
            Ok((parcel_id, Ok(path))) => info!("Parcel {}: report saved to {}", parcel_id, path.display()),
            Ok((parcel_id, Err(e))) => {
                error!("Parcel {}: {}", parcel_id, e);
                failures += 1;
            }
            Err(e) => {
                error!("Report task panicked: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        warn!("{} of {} reports failed", failures, cli.parcels.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

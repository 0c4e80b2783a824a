use crate::analyzer::AnalysisOrchestrator;
use crate::chart::ReportCharts;
use crate::model::{MonthlyRecord, Parcel, PeriodRange, ReportError};
use crate::normalizer::normalize_rows;
use crate::report::assembler::{ReportContext, assemble};
use crate::report::assets::AssetLoader;
use crate::report::overlay::PaginationOverlay;
use crate::report::pdf::render_pdf;
use crate::report::style::ReportStyle;
use crate::storage::ParcelRepository;
use crate::utils::{default_report_file_name, lookback_range};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub parcel_id: i64,
    pub months: u32,
    /// Destination file; a name under the output directory when absent.
    pub output: Option<PathBuf>,
}

/// End-to-end report pipeline for one parcel.
pub struct ReportGenerator<R: ParcelRepository> {
    repository: Arc<R>,
    orchestrator: Arc<AnalysisOrchestrator>,
    style: Arc<ReportStyle>,
    assets: Arc<AssetLoader>,
    output_dir: PathBuf,
}

impl<R: ParcelRepository> Clone for ReportGenerator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            orchestrator: self.orchestrator.clone(),
            style: self.style.clone(),
            assets: self.assets.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

impl<R: ParcelRepository> ReportGenerator<R> {
    pub fn new(
        repository: Arc<R>,
        orchestrator: Arc<AnalysisOrchestrator>,
        style: Arc<ReportStyle>,
        assets: Arc<AssetLoader>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            orchestrator,
            style,
            assets,
            output_dir: output_dir.into(),
        }
    }

    pub async fn generate(&self, request: &ReportRequest) -> Result<PathBuf, ReportError> {
        self.generate_at(request, Local::now().naive_local()).await
    }

    /// Same as [`Self::generate`] with a fixed clock.
    pub async fn generate_at(&self, request: &ReportRequest, now: NaiveDateTime) -> Result<PathBuf, ReportError> {
        let parcel = self
            .repository
            .find_active_parcel(request.parcel_id)
            .await?
            .ok_or(ReportError::ParcelNotFound(request.parcel_id))?;
        info!("Generating report for parcel {} ({})", parcel.id, parcel.name);

        let range = lookback_range(now.date(), request.months);
        let rows = self.repository.monthly_rows(parcel.id, &range).await?;
        info!("Fetched {} monthly rows from {} to {}", rows.len(), range.start, range.end);
        let records = normalize_rows(&parcel.name, &rows)?;

        let destination = request
            .output
            .clone()
            .unwrap_or_else(|| self.output_dir.join(default_report_file_name(&parcel.name, now)));

        let job = RenderJob {
            parcel,
            range,
            generated_at: now,
            records,
            destination,
            orchestrator: self.orchestrator.clone(),
            style: self.style.clone(),
            assets: self.assets.clone(),
        };
        tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| ReportError::Task(e.to_string()))?
    }
}

/// CPU-bound part of a request: analysis, charts, layout and publishing.
struct RenderJob {
    parcel: Parcel,
    range: PeriodRange,
    generated_at: NaiveDateTime,
    records: Vec<MonthlyRecord>,
    destination: PathBuf,
    orchestrator: Arc<AnalysisOrchestrator>,
    style: Arc<ReportStyle>,
    assets: Arc<AssetLoader>,
}

impl RenderJob {
    fn run(self) -> Result<PathBuf, ReportError> {
        let analysis = self
            .orchestrator
            .run(&self.records, self.parcel.crop_type.as_deref());
        let charts = ReportCharts::render(&self.records, &self.style.palette)?;

        let cover_logo = self.assets.cover_logo();
        let header_mark = self.assets.header_mark();
        let context = ReportContext {
            parcel: &self.parcel,
            range: self.range,
            generated_at: self.generated_at,
            records: &self.records,
            analysis: &analysis,
            charts: &charts,
            cover_logo: cover_logo.as_ref(),
        };
        let document = assemble(&context, &self.style);
        debug!("Document assembled with {} blocks", document.blocks().len());

        let overlay = PaginationOverlay::new(&self.style, header_mark.as_ref(), self.generated_at.date());
        let title = format!("Informe {}", self.parcel.name);
        let pages = publish(&self.destination, |file| {
            Ok(render_pdf(&document, &self.style, &overlay, &title, file)?)
        })?;

        info!("Report written to {} ({} pages)", self.destination.display(), pages);
        Ok(self.destination)
    }
}

/// Writes through a temporary file in the destination directory and moves it
/// into place only when `write` succeeds.
pub fn publish<T, F>(destination: &Path, write: F) -> Result<T, ReportError>
where
    F: FnOnce(&mut fs::File) -> Result<T, ReportError>,
{
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".informe-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    let value = write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(destination).map_err(|e| ReportError::Io(e.error))?;
    Ok(value)
}

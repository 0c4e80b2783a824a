use agro_report::analyzer::AnalysisOrchestrator;
use agro_report::model::{MonthlyRow, Parcel, ReportError};
use agro_report::report::{AssetLoader, ReportGenerator, ReportRequest, ReportStyle};
use agro_report::storage::SqliteStorage;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 12, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn parcel(id: i64, name: &str, active: bool) -> Parcel {
    Parcel {
        id,
        name: name.into(),
        owner: "Cooperativa Norte".into(),
        crop_type: Some("Trigo".into()),
        area_hectares: 25.5,
        centroid: Some((-31.4, -64.2)),
        monitoring_start: NaiveDate::from_ymd_opt(2022, 6, 1),
        active,
    }
}

fn row(month: u32, ndvi: f64, savi: Option<f64>) -> MonthlyRow {
    MonthlyRow {
        year: 2023,
        month,
        period_text: None,
        ndvi_mean: Some(ndvi),
        ndmi_mean: Some(ndvi - 0.35),
        savi_mean: savi,
        temperature_mean: Some(20.0 + month as f64),
        precipitation_total: if month == 3 { None } else { Some(40.0) },
    }
}

fn seeded_storage(with_savi: bool) -> SqliteStorage {
    let storage = SqliteStorage::in_memory().unwrap();
    storage.save_parcel(&parcel(1, "Lote Norte", true)).unwrap();
    storage.save_parcel(&parcel(2, "Lote Vacío", true)).unwrap();
    storage.save_parcel(&parcel(3, "Lote Baja", false)).unwrap();
    for (month, ndvi) in [(1, 0.62), (2, 0.58), (3, 0.55), (4, 0.41), (5, 0.38), (6, 0.35)] {
        let savi = (with_savi && month % 2 == 0).then_some(ndvi * 0.8);
        storage.save_monthly_index(1, &row(month, ndvi, savi)).unwrap();
    }
    storage
}

fn generator(storage: SqliteStorage, output_dir: &Path) -> ReportGenerator<Mutex<SqliteStorage>> {
    ReportGenerator::new(
        Arc::new(Mutex::new(storage)),
        Arc::new(AnalysisOrchestrator::baseline()),
        Arc::new(ReportStyle::default()),
        Arc::new(AssetLoader::default()),
        output_dir,
    )
}

fn request(parcel_id: i64) -> ReportRequest {
    ReportRequest {
        parcel_id,
        months: 12,
        output: None,
    }
}

#[tokio::test]
async fn generates_pdf_with_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(seeded_storage(true), dir.path());

    let path = generator.generate_at(&request(1), now()).await.unwrap();

    assert_eq!(path, dir.path().join("informe_Lote_Norte_20231215_100000.pdf"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn writes_to_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(seeded_storage(false), dir.path());
    let target = dir.path().join("custom").join("parcela.pdf");

    let path = generator
        .generate_at(
            &ReportRequest {
                output: Some(target.clone()),
                ..request(1)
            },
            now(),
        )
        .await
        .unwrap();

    assert_eq!(path, target);
    assert!(fs::read(&target).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn no_rows_in_range_is_no_data_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(seeded_storage(true), dir.path());

    let err = generator.generate_at(&request(2), now()).await.unwrap_err();

    assert!(matches!(err, ReportError::NoData(name) if name == "Lote Vacío"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn rows_outside_the_lookback_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(seeded_storage(true), dir.path());
    let mut req = request(1);
    req.months = 3;
    let later = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();

    let err = generator.generate_at(&req, later).await.unwrap_err();
    assert!(matches!(err, ReportError::NoData(_)));
}

#[tokio::test]
async fn missing_or_inactive_parcel_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(seeded_storage(true), dir.path());

    for id in [3, 99] {
        let err = generator.generate_at(&request(id), now()).await.unwrap_err();
        assert!(matches!(err, ReportError::ParcelNotFound(found) if found == id));
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn concurrent_requests_produce_independent_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = seeded_storage(true);
    storage.save_parcel(&parcel(4, "Lote Sur", true)).unwrap();
    for month in 1..=4 {
        storage.save_monthly_index(4, &row(month, 0.7, None)).unwrap();
    }
    let generator = generator(storage, dir.path());

    let (first, second) = (request(1), request(4));
    let (a, b) = tokio::join!(
        generator.generate_at(&first, now()),
        generator.generate_at(&second, now())
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a, b);
    assert!(fs::read(a).unwrap().starts_with(b"%PDF"));
    assert!(fs::read(b).unwrap().starts_with(b"%PDF"));
}

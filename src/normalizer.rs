use crate::model::{MonthlyRecord, MonthlyRow, PeriodKey, ReportError};
use crate::utils::month_label;
use tracing::warn;

/// Turns stored monthly rows into strictly chronological records.
///
/// Rows are expected in ascending order already; they are re-sorted anyway
/// and a repeated period keeps its first occurrence.
pub fn normalize_rows(parcel_name: &str, rows: &[MonthlyRow]) -> Result<Vec<MonthlyRecord>, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoData(parcel_name.to_string()));
    }

    let mut records: Vec<MonthlyRecord> = rows.iter().map(normalize_row).collect();
    records.sort_by_key(|r| r.key);

    let before = records.len();
    records.dedup_by_key(|r| r.key);
    if records.len() != before {
        warn!(
            "Dropped {} duplicated monthly rows for parcel {}",
            before - records.len(),
            parcel_name
        );
    }

    Ok(records)
}

fn normalize_row(row: &MonthlyRow) -> MonthlyRecord {
    let label = row
        .period_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| month_label(row.year, row.month));

    MonthlyRecord {
        key: PeriodKey::new(row.year, row.month),
        label,
        ndvi: finite(row.ndvi_mean),
        ndmi: finite(row.ndmi_mean),
        savi: finite(row.savi_mean),
        temperature: finite(row.temperature_mean),
        precipitation: finite(row.precipitation_total),
    }
}

// NaN coming out of storage is treated as missing.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: u32, ndvi: Option<f64>) -> MonthlyRow {
        MonthlyRow {
            year,
            month,
            ndvi_mean: ndvi,
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_is_no_data() {
        let err = normalize_rows("Lote 1", &[]).unwrap_err();
        assert!(matches!(err, ReportError::NoData(name) if name == "Lote 1"));
    }

    #[test]
    fn missing_metrics_stay_absent() {
        let rows = vec![MonthlyRow {
            year: 2023,
            month: 4,
            ndvi_mean: Some(0.0),
            ndmi_mean: None,
            savi_mean: Some(f64::NAN),
            ..Default::default()
        }];
        let records = normalize_rows("p", &rows).unwrap();
        assert_eq!(records[0].ndvi, Some(0.0));
        assert_eq!(records[0].ndmi, None);
        assert_eq!(records[0].savi, None);
        assert_eq!(records[0].temperature, None);
    }

    #[test]
    fn records_are_chronological_and_unique() {
        let rows = vec![
            row(2023, 3, Some(0.6)),
            row(2023, 1, Some(0.2)),
            row(2023, 2, Some(0.4)),
            row(2023, 2, Some(0.9)),
        ];
        let records = normalize_rows("p", &rows).unwrap();
        let keys: Vec<String> = records.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["2023-01", "2023-02", "2023-03"]);
        assert_eq!(records[1].ndvi, Some(0.4));
    }

    #[test]
    fn stored_period_text_wins_over_generated_label() {
        let mut with_text = row(2023, 5, None);
        with_text.period_text = Some(" Mayo 2023 ".into());
        let records = normalize_rows("p", &[with_text, row(2023, 6, None)]).unwrap();
        assert_eq!(records[0].label, "Mayo 2023");
        assert_eq!(records[1].label, "Jun 2023");
    }
}

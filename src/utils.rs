// Utility functions
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

use crate::model::PeriodRange;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Short Spanish label for a month, e.g. `Mar 2023`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_ABBREVIATIONS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} {}", name, year)
}

/// Range starting on the first day of the month `months` before `today`'s month.
pub fn lookback_range(today: NaiveDate, months: u32) -> PeriodRange {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let start = first_of_month
        .checked_sub_months(Months::new(months))
        .unwrap_or(first_of_month);
    PeriodRange { start, end: today }
}

/// `informe_<name with underscores>_<timestamp>.pdf`. Spaces and path
/// separators become underscores so the name never leaves the output directory.
pub fn default_report_file_name(parcel_name: &str, generated_at: NaiveDateTime) -> String {
    let name: String = parcel_name
        .chars()
        .map(|c| if matches!(c, ' ' | '/' | '\\') { '_' } else { c })
        .collect();
    format!("informe_{}_{}.pdf", name, generated_at.format("%Y%m%d_%H%M%S"))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

use crate::model::MonthlyRecord;
use crate::report::block::{Block, TextStyle};
use crate::report::style::ReportStyle;

const HEADER: [&str; 6] = ["Período", "NDVI", "NDMI", "SAVI", "Temp. (°C)", "Precip. (mm)"];
const WIDTHS: [f32; 6] = [34.0, 26.0, 26.0, 26.0, 29.0, 29.0];

fn cell(value: Option<f64>, decimals: usize, marker: &str) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => marker.to_string(),
    }
}

pub fn rows(records: &[MonthlyRecord], style: &ReportStyle) -> Vec<Vec<String>> {
    let marker = style.no_data_marker.as_str();
    records
        .iter()
        .map(|r| {
            vec![
                r.label.clone(),
                cell(r.ndvi, 3, marker),
                cell(r.ndmi, 3, marker),
                cell(r.savi, 3, marker),
                cell(r.temperature, 1, marker),
                cell(r.precipitation, 1, marker),
            ]
        })
        .collect()
}

pub fn render(records: &[MonthlyRecord], style: &ReportStyle) -> Vec<Block> {
    vec![
        Block::heading("Datos Mensuales"),
        Block::DataTable {
            header: HEADER.iter().map(|h| h.to_string()).collect(),
            rows: rows(records, style),
            widths: WIDTHS.to_vec(),
        },
        Block::paragraph(
            TextStyle::Caption,
            format!("{} = sin dato para ese mes.", style.no_data_marker),
        ),
    ]
}

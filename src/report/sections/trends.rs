use crate::chart::{ChartArtifact, ReportCharts};
use crate::markup::sanitize;
use crate::model::{TrendResult, VegetationIndex};
use crate::report::block::{Block, TextStyle};
use crate::report::style::ReportStyle;

fn figure(chart: &ChartArtifact) -> Block {
    Block::Image {
        data: chart.png.clone(),
        width_mm: chart.display_width_mm,
        height_mm: chart.display_height_mm,
    }
}

fn legend(style: &ReportStyle, has_savi: bool) -> String {
    VegetationIndex::ALL
        .iter()
        .filter(|index| **index != VegetationIndex::Savi || has_savi)
        .map(|index| format!("{} ({})", index, style.palette.color_name(*index)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render(trend: &TrendResult, charts: &ReportCharts, has_savi: bool, style: &ReportStyle) -> Vec<Block> {
    let sign = if trend.percent_change > 0.0 { "+" } else { "" };
    let mut comparative_caption = format!(
        "Figura 2. Valor medio de cada índice en el período: {}.",
        legend(style, true)
    );
    if !has_savi {
        comparative_caption.push_str(" Sin observaciones de SAVI, su barra vale 0.");
    }

    vec![
        Block::heading("Tendencias y Evolución Temporal"),
        figure(&charts.time_series),
        Block::centered(
            TextStyle::Caption,
            format!("Figura 1. Evolución mensual de los índices: {}.", legend(style, has_savi)),
        ),
        Block::body(sanitize(&trend.summary)),
        Block::paragraph(TextStyle::Subheading, format!("Tendencia lineal de {}", trend.metric)),
        Block::body(format!(
            "<strong>Dirección:</strong> {} - {}<br/>\
             <strong>Cambio en el período:</strong> {}{:.1} %<br/>\
             <strong>Confianza:</strong> {} (R² = {:.3})",
            trend.direction.label(),
            trend.strength.label(),
            sign,
            trend.percent_change,
            trend.confidence.label(),
            trend.r_squared
        )),
        Block::Spacer(4.0),
        figure(&charts.comparative),
        Block::centered(TextStyle::Caption, comparative_caption),
    ]
}

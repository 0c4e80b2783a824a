use crate::markup::{escape, sanitize};
use crate::model::{AnalysisResult, IndexMetric, VegetationIndex};
use crate::report::block::{Block, TextStyle};
use crate::report::style::ReportStyle;

const MAX_ALERTS: usize = 3;

fn heading(index: VegetationIndex) -> String {
    let what = match index {
        VegetationIndex::Ndvi => "Salud de la vegetación",
        VegetationIndex::Ndmi => "Contenido de humedad",
        VegetationIndex::Savi => "Cobertura del suelo",
    };
    format!("Análisis {} - {}", index, what)
}

fn metric_line(metric: &IndexMetric) -> String {
    match metric {
        IndexMetric::CoveragePercent(p) => format!("<strong>Cobertura vegetal estimada:</strong> {:.0} %", p),
        IndexMetric::WaterRisk(risk) => format!("<strong>Riesgo hídrico:</strong> {}", risk.label()),
        IndexMetric::BareSoilPercent(p) => format!("<strong>Suelo desnudo estimado:</strong> {:.0} %", p),
    }
}

fn figures(result: &AnalysisResult, marker: &str) -> String {
    let stats = &result.statistics;
    match (result.has_data(), result.score, &result.metric) {
        (true, Some(score), Some(metric)) => format!(
            "<strong>Valor medio:</strong> {:.3} (mín. {:.3}, máx. {:.3})<br/>\
             <strong>Puntuación:</strong> {:.1}/10<br/>{}",
            stats.mean,
            stats.min,
            stats.max,
            score,
            metric_line(metric)
        ),
        _ => format!(
            "<strong>Valor medio:</strong> {m}<br/><strong>Puntuación:</strong> {m}",
            m = escape(marker)
        ),
    }
}

pub fn render(result: &AnalysisResult, style: &ReportStyle) -> Vec<Block> {
    let mut blocks = vec![
        Block::heading(heading(result.index)),
        Block::body(format!(
            "<strong>Estado:</strong> {} {}<br/>{}",
            result.state.icon,
            escape(&result.state.label),
            figures(result, &style.no_data_marker)
        )),
        Block::paragraph(TextStyle::Subheading, "Interpretación técnica"),
        Block::body(sanitize(&result.technical_interpretation)),
        Block::paragraph(TextStyle::Subheading, "En palabras simples"),
        Block::body(sanitize(&result.simple_interpretation)),
    ];

    if !result.alerts.is_empty() {
        blocks.push(Block::paragraph(TextStyle::Subheading, "Alertas"));
        for alert in result.alerts.iter().take(MAX_ALERTS) {
            blocks.push(Block::body(format!(
                "{} <strong>{}:</strong> {}",
                alert.icon,
                escape(&alert.title),
                sanitize(&escape(&alert.message))
            )));
        }
    }
    blocks
}

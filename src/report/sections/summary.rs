use crate::markup::{escape, sanitize};
use crate::model::{AnalysisBundle, AnalysisResult};
use crate::report::block::{Block, TextStyle};
use crate::report::style::ReportStyle;

/// Mean of the NDVI and NDMI scores, one decimal. SAVI never takes part.
/// An index without data is left out of the mean; `None` when both are.
pub fn overall_score(ndvi: &AnalysisResult, ndmi: &AnalysisResult) -> Option<f64> {
    let scores: Vec<f64> = [ndvi.score, ndmi.score].into_iter().flatten().collect();
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

pub fn overall_label(score: f64) -> &'static str {
    if score >= 8.0 {
        "Excelente"
    } else if score >= 6.0 {
        "Bueno"
    } else if score >= 4.0 {
        "Regular"
    } else {
        "Deficiente"
    }
}

fn score_text(score: Option<f64>, marker: &str) -> String {
    match score {
        Some(score) => format!("{:.1}/10", score),
        None => escape(marker),
    }
}

fn score_line(result: &AnalysisResult, marker: &str) -> String {
    format!(
        "{} <strong>{} ({}):</strong> {} - {}",
        result.state.icon,
        result.index,
        result.index.meaning(),
        score_text(result.score, marker),
        escape(&result.state.label)
    )
}

pub fn render(analysis: &AnalysisBundle, style: &ReportStyle) -> Vec<Block> {
    let marker = style.no_data_marker.as_str();
    let score = overall_score(&analysis.ndvi, &analysis.ndmi);
    let high = analysis.high_priority_count();

    let overall = match score {
        Some(score) => format!("Puntuación general: {:.1}/10 ({})", score, overall_label(score)),
        None => format!("Puntuación general: {}", escape(marker)),
    };
    let mut blocks = vec![
        Block::heading("Resumen Ejecutivo"),
        Block::paragraph(TextStyle::Subtitle, overall),
        Block::paragraph(TextStyle::Subheading, "Estado de los indicadores"),
    ];

    let mut lines = vec![score_line(&analysis.ndvi, marker), score_line(&analysis.ndmi, marker)];
    if let Some(savi) = &analysis.savi {
        lines.push(score_line(savi, marker));
    }
    blocks.push(Block::body(lines.join("<br/>")));

    blocks.push(Block::paragraph(TextStyle::Subheading, "Tendencia"));
    blocks.push(Block::body(format!(
        "<strong>{}:</strong> {} ({}, confianza {}).<br/>{}",
        analysis.trend.metric,
        analysis.trend.direction.label(),
        analysis.trend.strength.label().to_lowercase(),
        analysis.trend.confidence.label().to_lowercase(),
        sanitize(&analysis.trend.summary)
    )));

    blocks.push(Block::paragraph(TextStyle::Subheading, "Acciones"));
    let actions = match high {
        0 => "No hay recomendaciones de prioridad alta.".to_string(),
        1 => "<strong>1</strong> recomendación de prioridad alta requiere atención.".to_string(),
        n => format!("<strong>{}</strong> recomendaciones de prioridad alta requieren atención.", n),
    };
    blocks.push(Block::body(format!(
        "{}<br/>Total de recomendaciones: {}.",
        actions,
        analysis.recommendations.len()
    )));
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sections::test_support::{bundle, result};
    use crate::model::VegetationIndex;

    #[test]
    fn overall_score_ignores_savi() {
        let mut analysis = bundle();
        analysis.ndvi.score = Some(8.0);
        analysis.ndmi.score = Some(6.0);
        assert_eq!(overall_score(&analysis.ndvi, &analysis.ndmi), Some(7.0));

        let mut savi = result(VegetationIndex::Savi);
        savi.score = Some(0.0);
        analysis.savi = Some(savi);
        let blocks = render(&analysis, &ReportStyle::default());
        assert!(blocks.iter().any(|b| b.markup() == Some("Puntuación general: 7.0/10 (Bueno)")));
    }

    #[test]
    fn reports_high_priority_count() {
        let analysis = bundle();
        let blocks = render(&analysis, &ReportStyle::default());
        let text: String = blocks.iter().filter_map(Block::markup).collect();
        assert!(text.contains("<strong>1</strong> recomendación de prioridad alta"));
        assert!(text.contains("Total de recomendaciones: 3."));
    }

    #[test]
    fn savi_line_only_when_present() {
        let mut analysis = bundle();
        let text = |a: &AnalysisBundle| -> String {
            render(a, &ReportStyle::default()).iter().filter_map(Block::markup).collect()
        };
        assert!(!text(&analysis).contains("SAVI"));
        analysis.savi = Some(result(VegetationIndex::Savi));
        assert!(text(&analysis).contains("SAVI (Cobertura)"));
    }

    #[test]
    fn labels() {
        assert_eq!(overall_label(8.0), "Excelente");
        assert_eq!(overall_label(7.9), "Bueno");
        assert_eq!(overall_label(4.0), "Regular");
        assert_eq!(overall_label(0.0), "Deficiente");
    }

    #[test]
    fn index_without_data_is_left_out_of_the_overall_score() {
        let mut analysis = bundle();
        analysis.ndvi.score = Some(6.4);
        analysis.ndmi.score = None;
        analysis.ndmi.statistics.count = 0;
        analysis.ndmi.state.label = "Sin datos".into();
        assert_eq!(overall_score(&analysis.ndvi, &analysis.ndmi), Some(6.4));

        let text: String = render(&analysis, &ReportStyle::default())
            .iter()
            .filter_map(Block::markup)
            .collect();
        assert!(text.contains("Puntuación general: 6.4/10 (Bueno)"));
        assert!(text.contains("NDMI (Humedad):</strong> N/D - Sin datos"));

        analysis.ndvi.score = None;
        assert_eq!(overall_score(&analysis.ndvi, &analysis.ndmi), None);
        let blocks = render(&analysis, &ReportStyle::default());
        assert!(blocks.iter().any(|b| b.markup() == Some("Puntuación general: N/D")));
    }
}

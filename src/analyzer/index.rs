use crate::analyzer::IndexAnalyzer;
use crate::analyzer::indicators::{describe, index_values, largest_drop};
use crate::model::{
    Alert, AnalysisResult, IndexMetric, IndexState, MonthlyRecord, Statistics, VegetationIndex, WaterRisk,
};

/// (upper bound, label, icon); the last band has no upper bound.
type Band = (f64, &'static str, &'static str);

const NDVI_BANDS: &[Band] = &[
    (0.2, "Muy bajo", "(!!)"),
    (0.4, "Bajo", "(!)"),
    (0.6, "Moderado", "(~)"),
    (0.8, "Bueno", "(+)"),
    (f64::INFINITY, "Excelente", "(++)"),
];

const NDMI_BANDS: &[Band] = &[
    (-0.1, "Estrés hídrico severo", "(!!)"),
    (0.1, "Estrés hídrico moderado", "(!)"),
    (0.3, "Humedad adecuada", "(+)"),
    (f64::INFINITY, "Humedad óptima", "(++)"),
];

const SAVI_BANDS: &[Band] = &[
    (0.15, "Suelo mayormente expuesto", "(!!)"),
    (0.3, "Cobertura escasa", "(!)"),
    (0.5, "Cobertura moderada", "(+)"),
    (f64::INFINITY, "Cobertura densa", "(++)"),
];

/// Month-on-month drop that raises an alert.
const SHARP_DROP: f64 = 0.2;

/// Baseline band-threshold analyzer, one instance per index.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdAnalyzer {
    index: VegetationIndex,
}

impl ThresholdAnalyzer {
    pub fn new(index: VegetationIndex) -> Self {
        Self { index }
    }

    pub fn ndvi() -> Self {
        Self::new(VegetationIndex::Ndvi)
    }

    pub fn ndmi() -> Self {
        Self::new(VegetationIndex::Ndmi)
    }

    pub fn savi() -> Self {
        Self::new(VegetationIndex::Savi)
    }

    fn bands(&self) -> &'static [Band] {
        match self.index {
            VegetationIndex::Ndvi => NDVI_BANDS,
            VegetationIndex::Ndmi => NDMI_BANDS,
            VegetationIndex::Savi => SAVI_BANDS,
        }
    }

    fn state(&self, stats: &Statistics) -> IndexState {
        if stats.count == 0 {
            return IndexState {
                label: "Sin datos".into(),
                icon: "(?)".into(),
            };
        }
        let bands = self.bands();
        let (_, label, icon) = bands
            .iter()
            .find(|(upper, _, _)| stats.mean < *upper)
            .unwrap_or(&bands[bands.len() - 1]);
        IndexState {
            label: label.to_string(),
            icon: icon.to_string(),
        }
    }

    fn score(&self, stats: &Statistics) -> Option<f64> {
        if stats.count == 0 {
            return None;
        }
        let raw = match self.index {
            VegetationIndex::Ndvi => stats.mean / 0.8 * 10.0,
            VegetationIndex::Ndmi => (stats.mean + 0.2) / 0.6 * 10.0,
            VegetationIndex::Savi => stats.mean / 0.6 * 10.0,
        };
        Some((raw.clamp(0.0, 10.0) * 10.0).round() / 10.0)
    }

    fn metric(&self, stats: &Statistics) -> Option<IndexMetric> {
        if stats.count == 0 {
            return None;
        }
        let metric = match self.index {
            VegetationIndex::Ndvi => {
                IndexMetric::CoveragePercent(((stats.mean - 0.1) / 0.7 * 100.0).clamp(0.0, 100.0).round())
            }
            VegetationIndex::Ndmi => IndexMetric::WaterRisk(if stats.mean < 0.0 {
                WaterRisk::High
            } else if stats.mean < 0.2 {
                WaterRisk::Medium
            } else {
                WaterRisk::Low
            }),
            VegetationIndex::Savi => {
                IndexMetric::BareSoilPercent(((1.0 - stats.mean / 0.6) * 100.0).clamp(0.0, 100.0).round())
            }
        };
        Some(metric)
    }

    fn alerts(&self, values: &[f64], stats: &Statistics) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if values.is_empty() {
            return alerts;
        }

        let critical = self.bands()[0].0;
        if stats.min < critical {
            alerts.push(Alert {
                title: format!("{} crítico", self.index),
                message: format!(
                    "Al menos un mes registró {} = {:.3}, por debajo del umbral crítico de {:.2}.",
                    self.index, stats.min, critical
                ),
                icon: "(!!)".into(),
            });
        }

        let drop = largest_drop(values);
        if drop > SHARP_DROP {
            alerts.push(Alert {
                title: "Caída brusca".into(),
                message: format!(
                    "El {} cayó un {:.0}% entre dos meses consecutivos.",
                    self.index,
                    drop * 100.0
                ),
                icon: "(!)".into(),
            });
        }

        match values.last() {
            Some(last) if values.len() > 1 && *last < stats.mean - stats.std_dev => {
                alerts.push(Alert {
                    title: "Último mes por debajo de lo habitual".into(),
                    message: format!(
                        "El valor más reciente ({:.3}) está por debajo del rango normal del período.",
                        last
                    ),
                    icon: "(!)".into(),
                });
            }
            _ => {}
        }

        alerts
    }

    fn technical_text(&self, stats: &Statistics, state: &IndexState, crop_type: Option<&str>) -> String {
        if stats.count == 0 {
            return format!("No hay observaciones de {} en el período analizado.", self.index);
        }
        let crop = crop_type
            .map(|c| format!(" para el cultivo de {}", c))
            .unwrap_or_default();
        format!(
            "{} medio de {:.3} (mínimo {:.3}, máximo {:.3}, desviación estándar {:.3}) \
             sobre {} meses con datos.<br><br>\
             El estado se clasifica como <strong>{}</strong>{}.",
            self.index, stats.mean, stats.min, stats.max, stats.std_dev, stats.count, state.label, crop
        )
    }

    fn simple_text(&self, stats: &Statistics, state: &IndexState) -> String {
        if stats.count == 0 {
            return "No tenemos datos suficientes para opinar sobre este indicador.".into();
        }
        let what = match self.index {
            VegetationIndex::Ndvi => "la salud de las plantas",
            VegetationIndex::Ndmi => "el agua disponible en las hojas",
            VegetationIndex::Savi => "cuánto suelo cubren las plantas",
        };
        format!(
            "Este indicador mide {}. <br> En este período el resultado es: <strong>{}</strong>.",
            what,
            state.label.to_lowercase()
        )
    }
}

impl IndexAnalyzer for ThresholdAnalyzer {
    fn index(&self) -> VegetationIndex {
        self.index
    }

    fn analyze(&self, records: &[MonthlyRecord], crop_type: Option<&str>) -> AnalysisResult {
        let values = index_values(records, self.index);
        let statistics = describe(&values);
        let state = self.state(&statistics);

        AnalysisResult {
            index: self.index,
            score: self.score(&statistics),
            technical_interpretation: self.technical_text(&statistics, &state, crop_type),
            simple_interpretation: self.simple_text(&statistics, &state),
            alerts: self.alerts(&values, &statistics),
            metric: self.metric(&statistics),
            statistics,
            state,
        }
    }
}

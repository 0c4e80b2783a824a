use crate::analyzer::{RecommendationEngine, RecommendationInputs};
use crate::model::{IndexMetric, Priority, Recommendation, TrendDirection, WaterRisk};

/// Bare soil share above which cover crops are suggested.
const BARE_SOIL_LIMIT: f64 = 40.0;

/// Rule table over scores, water risk, soil exposure and trend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleRecommendationEngine;

impl RuleRecommendationEngine {
    pub fn new() -> Self {
        Self
    }
}

fn rec(
    title: &str,
    priority: Priority,
    technical: String,
    simple: &str,
    actions: &[&str],
    impact: &str,
    time: &str,
) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        priority,
        technical_description: technical,
        simple_description: simple.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
        expected_impact: impact.to_string(),
        implementation_time: time.to_string(),
    }
}

impl RecommendationEngine for RuleRecommendationEngine {
    fn recommend(&self, inputs: &RecommendationInputs<'_>) -> Vec<Recommendation> {
        let mut out = Vec::new();
        let crop = inputs.crop_type.unwrap_or("el cultivo");

        if let Some(IndexMetric::WaterRisk(risk)) = inputs.ndmi.metric {
            if risk != WaterRisk::Low {
                let priority = if risk == WaterRisk::High { Priority::High } else { Priority::Medium };
                out.push(rec(
                    "Ajustar el programa de riego",
                    priority,
                    format!(
                        "NDMI medio {:.3} con riesgo hídrico {}. Revisar láminas de riego y \
                         uniformidad de aplicación en {}.",
                        inputs.ndmi.statistics.mean,
                        risk.label().to_lowercase(),
                        crop
                    ),
                    "Las plantas tienen menos agua de la que necesitan.",
                    &[
                        "Verificar el funcionamiento de los emisores",
                        "Medir la humedad del suelo a 20 y 40 cm",
                        "Aumentar la frecuencia de riego en las zonas más secas",
                        "Programar riegos en horas de menor evaporación",
                    ],
                    "Recuperación del estado hídrico en 2 a 4 semanas",
                    "1-2 semanas",
                ));
            }
        }

        if let Some(score) = inputs.ndvi.score.filter(|s| *s < 5.0) {
            out.push(rec(
                "Inspección sanitaria y nutricional",
                Priority::High,
                format!(
                    "Puntuación NDVI {:.1}/10 ({}). Descartar plagas, enfermedades o \
                     deficiencias de nitrógeno mediante muestreo dirigido.",
                    score, inputs.ndvi.state.label
                ),
                "El cultivo no está tan verde como debería; conviene revisarlo en campo.",
                &[
                    "Recorrer las zonas con menor vigor",
                    "Tomar muestras foliares para análisis de nutrientes",
                    "Revisar presencia de plagas y enfermedades",
                    "Evaluar una fertilización nitrogenada de corrección",
                    "Registrar hallazgos con coordenadas",
                    "Repetir la inspección a los 15 días",
                ],
                "Mejora del vigor vegetativo en el siguiente ciclo de medición",
                "1 semana",
            ));
        }

        if inputs.trend.direction == TrendDirection::Decreasing {
            out.push(rec(
                "Seguimiento de la tendencia negativa",
                Priority::Medium,
                format!(
                    "{} con tendencia decreciente ({:+.1}%, R² = {:.3}).",
                    inputs.trend.metric, inputs.trend.percent_change, inputs.trend.r_squared
                ),
                "El cultivo viene empeorando mes a mes.",
                &[
                    "Comparar con el mismo período de la campaña anterior",
                    "Aumentar la frecuencia de monitoreo",
                ],
                "Detección temprana de problemas",
                "Continuo",
            ));
        }

        if let Some(savi) = inputs.savi {
            if let Some(IndexMetric::BareSoilPercent(bare)) = savi.metric {
                if bare > BARE_SOIL_LIMIT {
                    out.push(rec(
                        "Mejorar la cobertura del suelo",
                        Priority::Medium,
                        format!("Exposición de suelo estimada en {:.0}% según SAVI.", bare),
                        "Hay mucho suelo descubierto entre las plantas.",
                        &[
                            "Evaluar cultivos de cobertura entre hileras",
                            "Mantener rastrojos en superficie",
                            "Revisar la densidad de siembra",
                        ],
                        "Menor erosión y mejor retención de humedad",
                        "Próxima campaña",
                    ));
                }
            }
        }

        out.push(rec(
            "Mantener el monitoreo satelital",
            Priority::Low,
            "Continuar con la serie mensual de NDVI, NDMI y SAVI para consolidar la línea base.".into(),
            "Seguir mirando el campo desde el satélite todos los meses.",
            &["Revisar el informe mensual", "Registrar labores realizadas para cruzarlas con los índices"],
            "Historial más confiable para decisiones futuras",
            "Continuo",
        ));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{IndexAnalyzer, ThresholdAnalyzer, TrendDetector, LinearTrendDetector};
    use crate::model::{MonthlyRecord, PeriodKey, VegetationIndex};

    fn records(ndvi: &[f64], ndmi: &[f64], savi: Option<f64>) -> Vec<MonthlyRecord> {
        ndvi.iter()
            .zip(ndmi)
            .enumerate()
            .map(|(i, (v, m))| MonthlyRecord {
                key: PeriodKey::new(2023, i as u32 + 1),
                label: format!("m{}", i + 1),
                ndvi: Some(*v),
                ndmi: Some(*m),
                savi,
                temperature: None,
                precipitation: None,
            })
            .collect()
    }

    fn run(records: &[MonthlyRecord]) -> Vec<Recommendation> {
        let ndvi = ThresholdAnalyzer::ndvi().analyze(records, None);
        let ndmi = ThresholdAnalyzer::ndmi().analyze(records, None);
        let savi = ThresholdAnalyzer::savi().analyze(records, None);
        let trend = LinearTrendDetector::new().detect(records, VegetationIndex::Ndvi);
        RuleRecommendationEngine::new().recommend(&RecommendationInputs {
            ndvi: &ndvi,
            ndmi: &ndmi,
            savi: records.iter().any(|r| r.savi.is_some()).then_some(&savi),
            trend: &trend,
            crop_type: Some("vid"),
        })
    }

    #[test]
    fn healthy_parcel_only_gets_monitoring() {
        let recs = run(&records(&[0.7, 0.72, 0.71], &[0.35, 0.36, 0.34], None));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::Low);
    }

    #[test]
    fn stressed_parcel_gets_high_priority_items_first() {
        let recs = run(&records(&[0.5, 0.35, 0.2], &[0.0, -0.1, -0.2], Some(0.1)));
        let priorities: Vec<Priority> = recs.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::High, Priority::Medium, Priority::Medium, Priority::Low]
        );
        assert!(recs[0].technical_description.contains("vid"));
    }
}

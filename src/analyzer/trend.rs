use crate::analyzer::TrendDetector;
use crate::analyzer::indicators::{compute_correlation, index_values, linear_fit};
use crate::model::{Confidence, MonthlyRecord, TrendDirection, TrendResult, TrendStrength, VegetationIndex};

/// Relative change (percent) under which a series counts as stable.
const STABLE_BAND: f64 = 5.0;

/// Least-squares trend over the present values of one index.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendDetector;

impl LinearTrendDetector {
    pub fn new() -> Self {
        Self
    }
}

impl TrendDetector for LinearTrendDetector {
    fn detect(&self, records: &[MonthlyRecord], metric: VegetationIndex) -> TrendResult {
        let values = index_values(records, metric);

        let Some((slope, intercept)) = linear_fit(&values) else {
            return TrendResult {
                metric,
                direction: TrendDirection::Stable,
                strength: TrendStrength::Weak,
                percent_change: 0.0,
                confidence: Confidence::Low,
                r_squared: 0.0,
                summary: format!(
                    "No hay suficientes meses con {} para estimar una tendencia.",
                    metric
                ),
            };
        };

        let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
        let r_squared = compute_correlation(&xs, &values).map(|r| r * r).unwrap_or(0.0);

        let fitted_start = intercept;
        let fitted_end = slope * (values.len() - 1) as f64 + intercept;
        let percent_change = if fitted_start.abs() > f64::EPSILON {
            (fitted_end - fitted_start) / fitted_start.abs() * 100.0
        } else {
            0.0
        };

        let direction = if percent_change.abs() < STABLE_BAND {
            TrendDirection::Stable
        } else if percent_change > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };

        let strength = match percent_change.abs() {
            c if c >= 25.0 => TrendStrength::Strong,
            c if c >= 10.0 => TrendStrength::Moderate,
            _ => TrendStrength::Weak,
        };

        let confidence = if values.len() < 4 {
            Confidence::Low
        } else if r_squared >= 0.7 {
            Confidence::High
        } else if r_squared >= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        let summary = format!(
            "El <strong>{}</strong> muestra una tendencia <strong>{}</strong> \
             ({:+.1}% a lo largo de {} meses).<br><br>Confiabilidad del ajuste: {} (R² = {:.3}).",
            metric,
            direction.label().to_lowercase(),
            percent_change,
            values.len(),
            confidence.label().to_lowercase(),
            r_squared
        );

        TrendResult {
            metric,
            direction,
            strength,
            percent_change,
            confidence,
            r_squared,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PeriodKey;

    fn records(ndvi: &[f64]) -> Vec<MonthlyRecord> {
        ndvi.iter()
            .enumerate()
            .map(|(i, v)| MonthlyRecord {
                key: PeriodKey::new(2023, i as u32 + 1),
                label: format!("m{}", i + 1),
                ndvi: Some(*v),
                ndmi: None,
                savi: None,
                temperature: None,
                precipitation: None,
            })
            .collect()
    }

    #[test]
    fn rising_series() {
        let trend = LinearTrendDetector::new().detect(&records(&[0.2, 0.3, 0.4, 0.5]), VegetationIndex::Ndvi);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.strength, TrendStrength::Strong);
        assert_eq!(trend.confidence, Confidence::High);
        assert!((trend.percent_change - 150.0).abs() < 1e-9);
        assert!((trend.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_is_stable() {
        let trend = LinearTrendDetector::new().detect(&records(&[0.5, 0.5, 0.5]), VegetationIndex::Ndvi);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.r_squared, 0.0);
    }

    #[test]
    fn single_point_has_no_trend() {
        let trend = LinearTrendDetector::new().detect(&records(&[0.5]), VegetationIndex::Ndvi);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.confidence, Confidence::Low);
        assert!(trend.summary.contains("No hay suficientes"));
    }

    #[test]
    fn falling_series() {
        let trend = LinearTrendDetector::new().detect(&records(&[0.8, 0.7, 0.6]), VegetationIndex::Ndvi);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert_eq!(trend.confidence, Confidence::Low);
    }
}

use crate::model::{MonthlyRecord, VegetationIndex};

/// One index line: `(position in series, value)` for present values only.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub index: VegetationIndex,
    pub points: Vec<(usize, f64)>,
}

impl PlotLine {
    /// Runs of consecutive months; an absent month breaks the line.
    pub fn segments(&self) -> Vec<Vec<(usize, f64)>> {
        let mut segments: Vec<Vec<(usize, f64)>> = Vec::new();
        for point in &self.points {
            match segments.last_mut() {
                Some(seg) if seg.last().is_some_and(|last| last.0 + 1 == point.0) => seg.push(*point),
                _ => segments.push(vec![*point]),
            }
        }
        segments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPlot {
    pub periods: Vec<String>,
    /// Numeric `MM/YY` axis labels, one per period.
    pub ticks: Vec<String>,
    pub lines: Vec<PlotLine>,
}

impl TimeSeriesPlot {
    /// NDVI and NDMI always; SAVI only when at least one month has it.
    pub fn from_records(records: &[MonthlyRecord]) -> Self {
        let has_savi = records.iter().any(|r| r.savi.is_some());
        let lines = VegetationIndex::ALL
            .iter()
            .filter(|index| **index != VegetationIndex::Savi || has_savi)
            .map(|index| PlotLine {
                index: *index,
                points: records
                    .iter()
                    .enumerate()
                    .filter_map(|(i, r)| index.value(r).map(|v| (i, v)))
                    .collect(),
            })
            .collect();

        Self {
            periods: records.iter().map(|r| r.label.clone()).collect(),
            ticks: records
                .iter()
                .map(|r| format!("{:02}/{:02}", r.key.month, r.key.year.rem_euclid(100)))
                .collect(),
            lines,
        }
    }

    /// Axis labels to draw, every n-th period so at most `max_labels` appear.
    /// The first period is always labelled.
    pub fn tick_labels(&self, max_labels: usize) -> Vec<(usize, &str)> {
        let step = self.ticks.len().div_ceil(max_labels.max(1)).max(1);
        self.ticks
            .iter()
            .enumerate()
            .step_by(step)
            .map(|(i, t)| (i, t.as_str()))
            .collect()
    }

    pub fn line(&self, index: VegetationIndex) -> Option<&PlotLine> {
        self.lines.iter().find(|l| l.index == index)
    }

    /// Padded value range covering every point and zero.
    pub fn value_range(&self) -> (f64, f64) {
        let values = self.lines.iter().flat_map(|l| l.points.iter().map(|p| p.1));
        let (lo, hi) = values.fold((0.0_f64, 0.1_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let pad = (hi - lo) * 0.1;
        (lo - pad, hi + pad)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotBar {
    pub index: VegetationIndex,
    pub mean: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparativePlot {
    pub bars: Vec<PlotBar>,
}

impl ComparativePlot {
    /// One bar per index with the mean of the present values; zero when none.
    pub fn from_records(records: &[MonthlyRecord]) -> Self {
        let bars = VegetationIndex::ALL
            .iter()
            .map(|index| {
                let mean = mean_of_present(records, *index);
                PlotBar {
                    index: *index,
                    mean,
                    label: format!("{:.3}", mean),
                }
            })
            .collect();
        Self { bars }
    }

    pub fn bar(&self, index: VegetationIndex) -> Option<&PlotBar> {
        self.bars.iter().find(|b| b.index == index)
    }

    pub fn value_range(&self) -> (f64, f64) {
        let lo = self.bars.iter().map(|b| b.mean).fold(0.0_f64, f64::min);
        let hi = self.bars.iter().map(|b| b.mean).fold(0.0_f64, f64::max);
        let hi = if hi <= 0.0 { 0.1 } else { hi * 1.25 };
        (lo * 1.25, hi)
    }
}

pub fn mean_of_present(records: &[MonthlyRecord], index: VegetationIndex) -> f64 {
    let values: Vec<f64> = records.iter().filter_map(|r| index.value(r)).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PeriodKey;

    fn record(month: u32, ndvi: Option<f64>, savi: Option<f64>) -> MonthlyRecord {
        MonthlyRecord {
            key: PeriodKey::new(2023, month),
            label: format!("2023-{:02}", month),
            ndvi,
            ndmi: Some(0.1),
            savi,
            temperature: None,
            precipitation: None,
        }
    }

    #[test]
    fn three_month_ndvi_series() {
        let records = vec![
            record(1, Some(0.2), None),
            record(2, Some(0.4), None),
            record(3, Some(0.6), None),
        ];
        let series = TimeSeriesPlot::from_records(&records);
        assert_eq!(series.periods, vec!["2023-01", "2023-02", "2023-03"]);
        assert_eq!(series.ticks, vec!["01/23", "02/23", "03/23"]);
        assert_eq!(series.line(VegetationIndex::Ndvi).unwrap().points, vec![(0, 0.2), (1, 0.4), (2, 0.6)]);
        assert!(series.line(VegetationIndex::Savi).is_none());
        assert_eq!(series.lines.len(), 2);

        let bars = ComparativePlot::from_records(&records);
        let ndvi = bars.bar(VegetationIndex::Ndvi).unwrap();
        assert!((ndvi.mean - 0.4).abs() < 1e-12);
        assert_eq!(ndvi.label, "0.400");
        assert_eq!(bars.bar(VegetationIndex::Savi).unwrap().mean, 0.0);
    }

    #[test]
    fn savi_bar_uses_only_present_values() {
        let records = vec![
            record(1, Some(0.5), Some(0.3)),
            record(2, Some(0.5), None),
            record(3, Some(0.5), Some(0.5)),
        ];
        let bars = ComparativePlot::from_records(&records);
        let savi = bars.bar(VegetationIndex::Savi).unwrap();
        assert!((savi.mean - 0.4).abs() < 1e-12);
        assert_eq!(TimeSeriesPlot::from_records(&records).lines.len(), 3);
    }

    #[test]
    fn absent_months_break_lines() {
        let records = vec![
            record(1, Some(0.2), None),
            record(2, None, None),
            record(3, Some(0.6), None),
            record(4, Some(0.7), None),
        ];
        let series = TimeSeriesPlot::from_records(&records);
        let ndvi = series.line(VegetationIndex::Ndvi).unwrap();
        assert_eq!(ndvi.points.len(), 3);
        assert_eq!(ndvi.segments(), vec![vec![(0, 0.2)], vec![(2, 0.6), (3, 0.7)]]);
    }

    #[test]
    fn ranges_include_zero_and_negatives() {
        let mut r = record(1, Some(0.5), None);
        r.ndmi = Some(-0.2);
        let (lo, hi) = TimeSeriesPlot::from_records(&[r.clone()]).value_range();
        assert!(lo < -0.2 && hi > 0.5);
        let (lo, hi) = ComparativePlot::from_records(&[r]).value_range();
        assert!(lo < -0.2 && hi > 0.5);
    }

    #[test]
    fn tick_labels_are_chronological_and_thinned() {
        let records: Vec<MonthlyRecord> = (0..24)
            .map(|i| {
                let mut r = record(1, Some(0.5), None);
                r.key = PeriodKey::new(2022 + i / 12, i as u32 % 12 + 1);
                r
            })
            .collect();
        let series = TimeSeriesPlot::from_records(&records);
        let all = series.tick_labels(24);
        assert_eq!(all.len(), 24);
        assert_eq!(all[0], (0, "01/22"));
        assert_eq!(all[23], (23, "12/23"));

        let thinned = series.tick_labels(12);
        assert_eq!(thinned.len(), 12);
        assert_eq!(thinned[1], (2, "03/22"));
    }
}

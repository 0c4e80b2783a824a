// Chart module: time-series and comparative figures rendered to self-contained PNG buffers.

pub mod glyphs;
pub mod plot;
pub mod raster;

pub use plot::{ComparativePlot, PlotBar, PlotLine, TimeSeriesPlot};

use crate::model::{ChartError, MonthlyRecord};
use crate::report::style::IndexPalette;
use tracing::debug;

const TIME_SERIES_PX: (u32, u32) = (1600, 800);
const COMPARATIVE_PX: (u32, u32) = (1400, 800);

/// A rendered figure plus the size it should occupy on the page.
/// Lives for one report request only.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub display_width_mm: f32,
    pub display_height_mm: f32,
}

/// Both figures of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCharts {
    pub time_series: ChartArtifact,
    pub comparative: ChartArtifact,
}

impl ReportCharts {
    pub fn render(records: &[MonthlyRecord], palette: &IndexPalette) -> Result<Self, ChartError> {
        Ok(Self {
            time_series: render_time_series(records, palette)?,
            comparative: render_comparative(records, palette)?,
        })
    }
}

/// One line per index over the period labels. Every call draws into its own buffer.
pub fn render_time_series(records: &[MonthlyRecord], palette: &IndexPalette) -> Result<ChartArtifact, ChartError> {
    let plot = TimeSeriesPlot::from_records(records);
    let (w, h) = TIME_SERIES_PX;
    let pixels = raster::time_series_pixels(&plot, palette, (w, h))?;
    let png = raster::encode_png(&pixels, w, h)?;
    debug!("Time-series chart: {} lines, {} bytes", plot.lines.len(), png.len());
    Ok(ChartArtifact {
        png,
        width_px: w,
        height_px: h,
        display_width_mm: 160.0,
        display_height_mm: 80.0,
    })
}

/// One bar per index with its period mean, labelled to three decimals.
pub fn render_comparative(records: &[MonthlyRecord], palette: &IndexPalette) -> Result<ChartArtifact, ChartError> {
    let plot = ComparativePlot::from_records(records);
    let (w, h) = COMPARATIVE_PX;
    let pixels = raster::comparative_pixels(&plot, palette, (w, h))?;
    let png = raster::encode_png(&pixels, w, h)?;
    debug!("Comparative chart: {} bars, {} bytes", plot.bars.len(), png.len());
    Ok(ChartArtifact {
        png,
        width_px: w,
        height_px: h,
        display_width_mm: 140.0,
        display_height_mm: 80.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PeriodKey;

    fn records(n: u32) -> Vec<MonthlyRecord> {
        (1..=n)
            .map(|m| MonthlyRecord {
                key: PeriodKey::new(2023, m),
                label: format!("m{}", m),
                ndvi: Some(0.2 * m as f64),
                ndmi: if m == 2 { None } else { Some(-0.1 + 0.05 * m as f64) },
                savi: (m % 2 == 1).then_some(0.3),
                temperature: None,
                precipitation: None,
            })
            .collect()
    }

    #[test]
    fn charts_are_valid_pngs_of_declared_size() {
        let charts = ReportCharts::render(&records(3), &IndexPalette::default()).unwrap();
        for artifact in [&charts.time_series, &charts.comparative] {
            assert!(artifact.png.starts_with(&[0x89, b'P', b'N', b'G']));
            let decoded = image::load_from_memory(&artifact.png).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (artifact.width_px, artifact.height_px));
        }
    }

    #[test]
    fn single_month_series_renders() {
        assert!(render_time_series(&records(1), &IndexPalette::default()).is_ok());
    }

    #[test]
    fn rendering_is_deterministic() {
        let palette = IndexPalette::default();
        let a = render_comparative(&records(4), &palette).unwrap();
        let b = render_comparative(&records(4), &palette).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn concurrent_renders_do_not_interfere() {
        let expected = render_time_series(&records(5), &IndexPalette::default()).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| render_time_series(&records(5), &IndexPalette::default()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}

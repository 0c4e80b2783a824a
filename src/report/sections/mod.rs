// Section builders: pure functions from report data to renderable blocks.

pub mod cover;
pub mod index;
pub mod parcel;
pub mod recommendations;
pub mod summary;
pub mod table;
pub mod trends;

use crate::chart::ReportCharts;
use crate::model::{AnalysisBundle, AnalysisResult, MonthlyRecord, Parcel, PeriodRange, Recommendation, TrendResult};
use crate::report::assets::BrandingImage;
use crate::report::block::Block;
use crate::report::style::ReportStyle;
use chrono::NaiveDateTime;

/// One document section and the data it is built from.
#[derive(Debug, Clone, Copy)]
pub enum Section<'a> {
    Cover {
        parcel: &'a Parcel,
        range: &'a PeriodRange,
        generated_at: NaiveDateTime,
        logo: Option<&'a BrandingImage>,
    },
    Summary(&'a AnalysisBundle),
    ParcelInfo(&'a Parcel),
    Index(&'a AnalysisResult),
    Trends {
        trend: &'a TrendResult,
        charts: &'a ReportCharts,
        has_savi: bool,
    },
    Recommendations(&'a [Recommendation]),
    DataTable(&'a [MonthlyRecord]),
}

impl Section<'_> {
    pub fn render(&self, style: &ReportStyle) -> Vec<Block> {
        match *self {
            Section::Cover {
                parcel,
                range,
                generated_at,
                logo,
            } => cover::render(parcel, range, generated_at, logo, style),
            Section::Summary(analysis) => summary::render(analysis, style),
            Section::ParcelInfo(parcel) => parcel::render(parcel, style),
            Section::Index(result) => index::render(result, style),
            Section::Trends {
                trend,
                charts,
                has_savi,
            } => trends::render(trend, charts, has_savi, style),
            Section::Recommendations(recs) => recommendations::render(recs, style),
            Section::DataTable(records) => table::render(records, style),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Section::Cover { .. } => "cover".into(),
            Section::Summary(_) => "summary".into(),
            Section::ParcelInfo(_) => "parcel".into(),
            Section::Index(result) => result.index.code().to_lowercase(),
            Section::Trends { .. } => "trends".into(),
            Section::Recommendations(_) => "recommendations".into(),
            Section::DataTable(_) => "data".into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::chart::{ChartArtifact, ReportCharts};
    use crate::model::*;

    pub fn result(index: VegetationIndex) -> AnalysisResult {
        AnalysisResult {
            index,
            statistics: Statistics {
                mean: 0.5,
                min: 0.3,
                max: 0.7,
                std_dev: 0.1,
                count: 6,
            },
            state: IndexState {
                label: "Bueno".into(),
                icon: "(+)".into(),
            },
            score: Some(6.0),
            technical_interpretation: "Texto técnico.".into(),
            simple_interpretation: "Texto simple.".into(),
            alerts: Vec::new(),
            metric: Some(match index {
                VegetationIndex::Ndvi => IndexMetric::CoveragePercent(57.0),
                VegetationIndex::Ndmi => IndexMetric::WaterRisk(WaterRisk::Low),
                VegetationIndex::Savi => IndexMetric::BareSoilPercent(20.0),
            }),
        }
    }

    pub fn trend() -> TrendResult {
        TrendResult {
            metric: VegetationIndex::Ndvi,
            direction: TrendDirection::Stable,
            strength: TrendStrength::Weak,
            percent_change: 1.5,
            confidence: Confidence::Medium,
            r_squared: 0.5,
            summary: "El NDVI se mantiene estable.".into(),
        }
    }

    pub fn recommendation(title: &str, priority: Priority) -> Recommendation {
        Recommendation {
            title: title.into(),
            priority,
            technical_description: "Descripción técnica.".into(),
            simple_description: "Descripción simple.".into(),
            actions: vec!["Revisar".into()],
            expected_impact: "Mejora".into(),
            implementation_time: "1 semana".into(),
        }
    }

    pub fn bundle() -> AnalysisBundle {
        AnalysisBundle {
            ndvi: result(VegetationIndex::Ndvi),
            ndmi: result(VegetationIndex::Ndmi),
            savi: None,
            trend: trend(),
            recommendations: vec![
                recommendation("Seguimiento", Priority::Medium),
                recommendation("Inspección", Priority::High),
                recommendation("Monitoreo", Priority::Low),
            ],
        }
    }

    pub fn charts() -> ReportCharts {
        let artifact = |n: u8| ChartArtifact {
            png: vec![n],
            width_px: 10,
            height_px: 5,
            display_width_mm: 160.0,
            display_height_mm: 80.0,
        };
        ReportCharts {
            time_series: artifact(1),
            comparative: artifact(2),
        }
    }
}

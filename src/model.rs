// Core structs: Parcel, MonthlyRecord, analysis results and error types
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A monitored agricultural parcel as returned by the data-access layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub crop_type: Option<String>,
    pub area_hectares: f64,
    pub centroid: Option<(f64, f64)>,
    pub monitoring_start: Option<NaiveDate>,
    pub active: bool,
}

/// One stored monthly row, exactly as it comes out of storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyRow {
    pub year: i32,
    pub month: u32,
    pub period_text: Option<String>,
    pub ndvi_mean: Option<f64>,
    pub ndmi_mean: Option<f64>,
    pub savi_mean: Option<f64>,
    pub temperature_mean: Option<f64>,
    pub precipitation_total: Option<f64>,
}

/// Chronological key of a monthly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year(), date.month())
    }

    /// Months since year zero, handy for range checks.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Inclusive date range covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn start_key(&self) -> PeriodKey {
        PeriodKey::from_date(self.start)
    }

    pub fn end_key(&self) -> PeriodKey {
        PeriodKey::from_date(self.end)
    }
}

/// Normalized monthly measurements. Absent metrics stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    pub key: PeriodKey,
    pub label: String,
    pub ndvi: Option<f64>,
    pub ndmi: Option<f64>,
    pub savi: Option<f64>,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegetationIndex {
    Ndvi,
    Ndmi,
    Savi,
}

impl VegetationIndex {
    pub const ALL: [VegetationIndex; 3] = [Self::Ndvi, Self::Ndmi, Self::Savi];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ndvi => "NDVI",
            Self::Ndmi => "NDMI",
            Self::Savi => "SAVI",
        }
    }

    /// Short qualitative name used in legends and captions.
    pub fn meaning(&self) -> &'static str {
        match self {
            Self::Ndvi => "Salud",
            Self::Ndmi => "Humedad",
            Self::Savi => "Cobertura",
        }
    }

    pub fn value(&self, record: &MonthlyRecord) -> Option<f64> {
        match self {
            Self::Ndvi => record.ndvi,
            Self::Ndmi => record.ndmi,
            Self::Savi => record.savi,
        }
    }
}

impl fmt::Display for VegetationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Descriptive statistics over the present values of one index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexState {
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterRisk {
    Low,
    Medium,
    High,
}

impl WaterRisk {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Bajo",
            Self::Medium => "Medio",
            Self::High => "Alto",
        }
    }
}

/// The one derived metric each index analyzer reports.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexMetric {
    CoveragePercent(f64),
    WaterRisk(WaterRisk),
    BareSoilPercent(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub index: VegetationIndex,
    pub statistics: Statistics,
    pub state: IndexState,
    /// Within `0.0..=10.0`; `None` when the series has no values.
    pub score: Option<f64>,
    pub technical_interpretation: String,
    pub simple_interpretation: String,
    pub alerts: Vec<Alert>,
    pub metric: Option<IndexMetric>,
}

impl AnalysisResult {
    pub fn has_data(&self) -> bool {
        self.statistics.count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Increasing => "Creciente",
            Self::Decreasing => "Decreciente",
            Self::Stable => "Estable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
}

impl TrendStrength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "Débil",
            Self::Moderate => "Moderada",
            Self::Strong => "Fuerte",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Baja",
            Self::Medium => "Media",
            Self::High => "Alta",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub metric: VegetationIndex,
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    pub percent_change: f64,
    pub confidence: Confidence,
    pub r_squared: f64,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Fixed rendering order of the recommendation groups.
    pub const ORDER: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "Prioridad Alta",
            Self::Medium => "Prioridad Media",
            Self::Low => "Prioridad Baja",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub priority: Priority,
    pub technical_description: String,
    pub simple_description: String,
    pub actions: Vec<String>,
    pub expected_impact: String,
    pub implementation_time: String,
}

/// Composite output of the analysis stage.
#[derive(Debug, Clone)]
pub struct AnalysisBundle {
    pub ndvi: AnalysisResult,
    pub ndmi: AnalysisResult,
    pub savi: Option<AnalysisResult>,
    pub trend: TrendResult,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisBundle {
    pub fn high_priority_count(&self) -> usize {
        self.recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("png encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed markup: {0}")]
    Markup(String),
    #[error("pdf backend error: {0}")]
    Pdf(String),
    #[error("image could not be embedded: {0}")]
    Image(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("parcel {0} not found or inactive")]
    ParcelNotFound(i64),
    #[error("no data available for parcel '{0}' in the requested period")]
    NoData(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("chart rendering failed: {0}")]
    Chart(#[from] ChartError),
    #[error("document rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("report task failed: {0}")]
    Task(String),
}

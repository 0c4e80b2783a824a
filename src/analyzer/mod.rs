// Analyzer module: collaborator contracts, baseline implementations and the orchestrator.

pub mod index;
pub mod indicators;
pub mod orchestrator;
pub mod recommendations;
pub mod trend;

pub use index::ThresholdAnalyzer;
pub use orchestrator::AnalysisOrchestrator;
pub use recommendations::RuleRecommendationEngine;
pub use trend::LinearTrendDetector;

use crate::model::{AnalysisResult, MonthlyRecord, Recommendation, TrendResult, VegetationIndex};

/// Analyzes one vegetation index over a monthly series.
pub trait IndexAnalyzer: Send + Sync {
    fn index(&self) -> VegetationIndex;
    fn analyze(&self, records: &[MonthlyRecord], crop_type: Option<&str>) -> AnalysisResult;
}

/// Detects the temporal trend of one metric.
pub trait TrendDetector: Send + Sync {
    fn detect(&self, records: &[MonthlyRecord], metric: VegetationIndex) -> TrendResult;
}

/// Everything the recommendation engine gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInputs<'a> {
    pub ndvi: &'a AnalysisResult,
    pub ndmi: &'a AnalysisResult,
    pub savi: Option<&'a AnalysisResult>,
    pub trend: &'a TrendResult,
    pub crop_type: Option<&'a str>,
}

/// Produces an ordered list of recommendations from prior analysis results.
pub trait RecommendationEngine: Send + Sync {
    fn recommend(&self, inputs: &RecommendationInputs<'_>) -> Vec<Recommendation>;
}

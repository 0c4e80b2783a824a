use crate::analyzer::{
    IndexAnalyzer, LinearTrendDetector, RecommendationEngine, RecommendationInputs, RuleRecommendationEngine,
    ThresholdAnalyzer, TrendDetector,
};
use crate::model::{AnalysisBundle, MonthlyRecord, VegetationIndex};
use tracing::{debug, info};

/// Runs the external analyzers and assembles their outputs into one bundle.
pub struct AnalysisOrchestrator {
    ndvi: Box<dyn IndexAnalyzer>,
    ndmi: Box<dyn IndexAnalyzer>,
    savi: Box<dyn IndexAnalyzer>,
    trend: Box<dyn TrendDetector>,
    recommender: Box<dyn RecommendationEngine>,
}

impl AnalysisOrchestrator {
    pub fn new(
        ndvi: Box<dyn IndexAnalyzer>,
        ndmi: Box<dyn IndexAnalyzer>,
        savi: Box<dyn IndexAnalyzer>,
        trend: Box<dyn TrendDetector>,
        recommender: Box<dyn RecommendationEngine>,
    ) -> Self {
        Self {
            ndvi,
            ndmi,
            savi,
            trend,
            recommender,
        }
    }

    /// Orchestrator wired with the threshold analyzers shipped in this crate.
    pub fn baseline() -> Self {
        Self::new(
            Box::new(ThresholdAnalyzer::ndvi()),
            Box::new(ThresholdAnalyzer::ndmi()),
            Box::new(ThresholdAnalyzer::savi()),
            Box::new(LinearTrendDetector::new()),
            Box::new(RuleRecommendationEngine::new()),
        )
    }

    pub fn run(&self, records: &[MonthlyRecord], crop_type: Option<&str>) -> AnalysisBundle {
        let ndvi = self.ndvi.analyze(records, crop_type);
        let ndmi = self.ndmi.analyze(records, crop_type);

        let savi = if records.iter().any(|r| r.savi.is_some()) {
            Some(self.savi.analyze(records, crop_type))
        } else {
            debug!("No SAVI values in series, skipping SAVI analysis");
            None
        };

        let trend = self.trend.detect(records, VegetationIndex::Ndvi);

        let recommendations = self.recommender.recommend(&RecommendationInputs {
            ndvi: &ndvi,
            ndmi: &ndmi,
            savi: savi.as_ref(),
            trend: &trend,
            crop_type,
        });

        info!(
            "Analysis done: NDVI {:?}, NDMI {:?}, SAVI {}, {} recommendations",
            ndvi.score,
            ndmi.score,
            if savi.is_some() { "present" } else { "absent" },
            recommendations.len()
        );

        AnalysisBundle {
            ndvi,
            ndmi,
            savi,
            trend,
            recommendations,
        }
    }
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::baseline()
    }
}

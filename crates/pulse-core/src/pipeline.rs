//! End-to-end analysis pipeline
//!
//! store -> aggregates -> trends -> insights -> recommendations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregate::{
    engagement_metrics, growth_metrics, kpi_summary, overview, EngagementMetrics, KpiSummary,
    MonthlyAggregate, OverviewKpis,
};
use crate::config::PipelineConfig;
use crate::insights::{AnalysisContext, Insight, InsightEngine};
use crate::recommendations::{plan, Recommendations};
use crate::segments::{
    campaign_overview, demographic_overview, CampaignOverview, DemographicOverview,
};
use crate::store::MetricsStore;
use crate::trends::{identify_trends, TrendResult};

/// Everything the pipeline derives from a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub overview: OverviewKpis,
    pub kpis: BTreeMap<String, KpiSummary>,
    pub growth: BTreeMap<String, Vec<MonthlyAggregate>>,
    pub engagement: BTreeMap<String, EngagementMetrics>,
    pub trends: BTreeMap<String, TrendResult>,
    pub demographics: DemographicOverview,
    pub campaigns: CampaignOverview,
    /// Sorted by priority, most urgent first
    pub insights: Vec<Insight>,
    pub recommendations: Recommendations,
}

pub struct Pipeline {
    config: PipelineConfig,
    engine: InsightEngine,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            engine: InsightEngine::new(),
        }
    }

    /// Use a custom rule set
    pub fn with_engine(config: PipelineConfig, engine: InsightEngine) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over `store`.
    ///
    /// The store is only read, so running twice over the same store yields
    /// equal results.
    pub fn run(&self, store: &MetricsStore) -> Analysis {
        if store.metrics.is_empty() {
            warn!("No platform metrics to analyze");
        }

        let growth = growth_metrics(store);
        let engagement = engagement_metrics(store);
        let kpis = kpi_summary(store, &growth, &engagement);
        let trends = identify_trends(store, &self.config.trends);
        debug!(
            platforms = engagement.len(),
            rows = store.metrics.len(),
            "Aggregates computed"
        );

        let ctx = AnalysisContext::new(store, &self.config, &engagement, &trends);
        let insights = self.engine.analyze_all(&ctx);
        let recommendations = plan(&insights, &self.config.recommendations);

        info!(
            insights = insights.len(),
            recommendations = recommendations.len(),
            "Analysis complete"
        );

        Analysis {
            overview: overview(store),
            kpis,
            growth,
            engagement,
            trends,
            demographics: demographic_overview(store, self.config.report.top_segments),
            campaigns: campaign_overview(store),
            insights,
            recommendations,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Priority;
    use crate::test_utils::sample_store;

    #[test]
    fn test_run_is_idempotent() {
        let store = sample_store();
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.run(&store), pipeline.run(&store));
    }

    #[test]
    fn test_run_sample_store() {
        let analysis = Pipeline::default().run(&sample_store());

        assert_eq!(analysis.kpis.len(), 2);
        assert_eq!(analysis.insights.len(), 16);
        assert!(analysis
            .insights
            .windows(2)
            .all(|w| w[0].priority.rank() <= w[1].priority.rank()));

        let critical = analysis
            .insights
            .iter()
            .filter(|i| i.priority == Priority::Critical)
            .count();
        assert_eq!(critical, 2);
        assert_eq!(analysis.recommendations.short_term.len(), 3);
        assert_eq!(analysis.recommendations.medium_term.len(), 3);
        assert_eq!(analysis.recommendations.long_term.len(), 3);
    }

    #[test]
    fn test_run_empty_store() {
        let analysis = Pipeline::default().run(&MetricsStore::default());
        assert!(analysis.insights.is_empty());
        assert!(analysis.kpis.is_empty());
        assert!(analysis.recommendations.short_term.is_empty());
        assert_eq!(analysis.recommendations.long_term.len(), 3);
    }

    #[test]
    fn test_posting_hour_can_be_disabled() {
        let store = sample_store();
        let mut config = PipelineConfig::default();
        config.posting_hour.enabled = false;
        let analysis = Pipeline::new(config).run(&store);
        assert_eq!(analysis.insights.len(), 15);
    }
}

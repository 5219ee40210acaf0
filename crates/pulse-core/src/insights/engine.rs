//! Insight engine - runs the registered rules and ranks their output

use std::collections::BTreeMap;

use crate::aggregate::EngagementMetrics;
use crate::config::PipelineConfig;
use crate::store::MetricsStore;
use crate::trends::TrendResult;

use super::types::{sort_by_priority, Insight};
use super::{
    CampaignRule, DemographicRule, GrowthRule, InteractionRule, PerformanceRule, PostingHourRule,
    SeasonalityRule, TrendRule,
};

/// Context provided to insight rules
pub struct AnalysisContext<'a> {
    pub store: &'a MetricsStore,
    pub config: &'a PipelineConfig,
    /// Engagement metrics per platform
    pub engagement: &'a BTreeMap<String, EngagementMetrics>,
    /// Trend signals per platform
    pub trends: &'a BTreeMap<String, TrendResult>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        store: &'a MetricsStore,
        config: &'a PipelineConfig,
        engagement: &'a BTreeMap<String, EngagementMetrics>,
        trends: &'a BTreeMap<String, TrendResult>,
    ) -> Self {
        Self {
            store,
            config,
            engagement,
            trends,
        }
    }
}

/// A rule that turns aggregates into zero or more insights
pub trait InsightRule: Send + Sync {
    /// Stable identifier (e.g. "performance")
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule. Must be a pure function of the context.
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// The main insight engine
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules, in generation order
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(PerformanceRule));
        engine.register(Box::new(GrowthRule));
        engine.register(Box::new(DemographicRule));
        engine.register(Box::new(CampaignRule));
        engine.register(Box::new(TrendRule));
        engine.register(Box::new(SeasonalityRule));
        engine.register(Box::new(PostingHourRule));
        engine.register(Box::new(InteractionRule));

        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule, concatenate the results, and sort by priority.
    ///
    /// The sort is stable, so insights of the same tier stay in rule
    /// registration order.
    pub fn analyze_all(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut all_insights = vec![];

        for rule in &self.rules {
            let insights = rule.evaluate(ctx);
            tracing::debug!(rule = rule.id(), count = insights.len(), "Rule evaluated");
            all_insights.extend(insights);
        }

        sort_by_priority(&mut all_insights);
        all_insights
    }

    /// Identifiers of the registered rules, in order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::{InsightType, Priority};

    struct FixedRule(Vec<Insight>);

    impl InsightRule for FixedRule {
        fn id(&self) -> &'static str {
            "fixed"
        }

        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn evaluate(&self, _ctx: &AnalysisContext<'_>) -> Vec<Insight> {
            self.0.clone()
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_ids(),
            vec![
                "performance",
                "growth",
                "demographic",
                "campaign",
                "trend",
                "seasonality",
                "posting_hour",
                "interaction"
            ]
        );
    }

    #[test]
    fn test_analyze_empty_store() {
        let store = MetricsStore::default();
        let config = PipelineConfig::default();
        let (engagement, trends) = (BTreeMap::new(), BTreeMap::new());
        let ctx = AnalysisContext::new(&store, &config, &engagement, &trends);

        let insights = InsightEngine::new().analyze_all(&ctx);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_analyze_all_sorts_across_rules() {
        let mut engine = InsightEngine::empty();
        engine.register(Box::new(FixedRule(vec![
            Insight::new(InsightType::Content, Priority::Low, "low", "", ""),
            Insight::new(InsightType::Growth, Priority::High, "high-1", "", ""),
        ])));
        engine.register(Box::new(FixedRule(vec![
            Insight::new(InsightType::Trend, Priority::Critical, "critical", "", ""),
            Insight::new(InsightType::Growth, Priority::High, "high-2", "", ""),
        ])));

        let store = MetricsStore::default();
        let config = PipelineConfig::default();
        let (engagement, trends) = (BTreeMap::new(), BTreeMap::new());
        let ctx = AnalysisContext::new(&store, &config, &engagement, &trends);

        let titles: Vec<String> = engine
            .analyze_all(&ctx)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["critical", "high-1", "high-2", "low"]);
    }
}

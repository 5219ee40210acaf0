//! Content timing and interaction mix rules

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PostingHourConfig;
use crate::models::{percent_of, ratio, MetricRecord};

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Priority};

/// Suggests a posting hour.
///
/// The input data has no time-of-day column, so every metrics row gets a
/// synthetic hour drawn from a generator seeded with the configured seed.
/// The same seed and data always produce the same hour.
pub struct PostingHourRule;

/// Hour with the highest mean engagement after seeded hour assignment.
/// Ties go to the earlier hour.
pub fn simulated_best_hour(metrics: &[MetricRecord], config: &PostingHourConfig) -> Option<u32> {
    if metrics.is_empty() || config.first_hour > config.last_hour {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut by_hour: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in metrics {
        let hour = rng.random_range(config.first_hour..=config.last_hour);
        let entry = by_hour.entry(hour).or_default();
        entry.0 += record.engagement as f64;
        entry.1 += 1;
    }

    by_hour
        .into_iter()
        .map(|(hour, (sum, n))| (hour, ratio(sum, n as f64)))
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .map(|(hour, _)| hour)
}

impl InsightRule for PostingHourRule {
    fn id(&self) -> &'static str {
        "posting_hour"
    }

    fn name(&self) -> &'static str {
        "Posting Hour"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let config = &ctx.config.posting_hour;
        if !config.enabled {
            return vec![];
        }
        let Some(hour) = simulated_best_hour(&ctx.store.metrics, config) else {
            return vec![];
        };

        vec![Insight::new(
            InsightType::Content,
            Priority::Medium,
            format!("Best Posting Hour: {}h", hour),
            format!(
                "Posts around {}h show the highest mean engagement in a seeded simulation \
                 (the data carries no posting times).",
                hour
            ),
            format!(
                "Schedule key posts around {}h and confirm with real posting times.",
                hour
            ),
        )]
    }
}

/// Reports which interaction type dominates engagement
pub struct InteractionRule;

impl InsightRule for InteractionRule {
    fn id(&self) -> &'static str {
        "interaction"
    }

    fn name(&self) -> &'static str {
        "Interaction Mix"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let metrics = &ctx.store.metrics;
        let totals = [
            ("likes", metrics.iter().map(|r| r.likes).sum::<u64>()),
            ("comments", metrics.iter().map(|r| r.comments).sum::<u64>()),
            ("shares", metrics.iter().map(|r| r.shares).sum::<u64>()),
        ];
        let all: u64 = totals.iter().map(|(_, n)| n).sum();
        if all == 0 {
            return vec![];
        }

        // Ties go to the earlier entry
        let Some((kind, count)) = totals
            .into_iter()
            .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        else {
            return vec![];
        };
        let share = percent_of(count as f64, all as f64);

        let mut label = kind.to_string();
        label[..1].make_ascii_uppercase();

        vec![Insight::new(
            InsightType::Interaction,
            Priority::Low,
            format!("{} Lead Interactions", label),
            format!("{} make up {:.1}% of all interactions.", label, share),
            format!("Create content that invites more {} to lift engagement.", kind),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::store::MetricsStore;
    use crate::test_utils::{daily_series, metric_with_interactions};

    fn evaluate(rule: &dyn InsightRule, store: &MetricsStore, config: &PipelineConfig) -> Vec<Insight> {
        let (engagement, trends) = (BTreeMap::new(), BTreeMap::new());
        rule.evaluate(&AnalysisContext::new(store, config, &engagement, &trends))
    }

    #[test]
    fn test_posting_hour_is_deterministic() {
        let store = daily_series("Instagram", 60, |d| (1000, 1000, 20 + d % 7));
        let config = PipelineConfig::default();

        let first = evaluate(&PostingHourRule, &store, &config);
        let second = evaluate(&PostingHourRule, &store, &config);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].insight_type, InsightType::Content);
        assert_eq!(first[0].priority, Priority::Medium);

        let hour = simulated_best_hour(&store.metrics, &config.posting_hour).unwrap();
        assert!((6..=22).contains(&hour));
        assert!(first[0].title.contains(&format!("{}h", hour)));
    }

    #[test]
    fn test_posting_hour_respects_range() {
        let store = daily_series("Instagram", 30, |d| (1000, 1000, d));
        let config = PostingHourConfig {
            first_hour: 9,
            last_hour: 9,
            ..PostingHourConfig::default()
        };
        assert_eq!(simulated_best_hour(&store.metrics, &config), Some(9));
    }

    #[test]
    fn test_posting_hour_disabled() {
        let store = daily_series("Instagram", 30, |d| (1000, 1000, d));
        let mut config = PipelineConfig::default();
        config.posting_hour.enabled = false;
        assert!(evaluate(&PostingHourRule, &store, &config).is_empty());
    }

    #[test]
    fn test_posting_hour_empty_store() {
        let config = PipelineConfig::default();
        assert!(evaluate(&PostingHourRule, &MetricsStore::default(), &config).is_empty());
    }

    #[test]
    fn test_interaction_mix() {
        let store = MetricsStore::new(
            vec![
                metric_with_interactions("2024-01-01", "Instagram", 1000, 50, 10, 30, 10),
                metric_with_interactions("2024-01-02", "Facebook", 1000, 50, 10, 20, 20),
            ],
            vec![],
            vec![],
        );
        let insights = evaluate(&InteractionRule, &store, &PipelineConfig::default());

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::Interaction);
        assert_eq!(insights[0].priority, Priority::Low);
        assert!(insights[0].title.starts_with("Comments"));
        assert!(insights[0].description.contains("50.0%"));
    }

    #[test]
    fn test_interaction_ties_prefer_likes() {
        let store = MetricsStore::new(
            vec![metric_with_interactions("2024-01-01", "Instagram", 1000, 30, 10, 10, 10)],
            vec![],
            vec![],
        );
        let insights = evaluate(&InteractionRule, &store, &PipelineConfig::default());
        assert!(insights[0].title.starts_with("Likes"));
    }

    #[test]
    fn test_no_interactions() {
        let store = MetricsStore::new(
            vec![metric_with_interactions("2024-01-01", "Instagram", 1000, 0, 0, 0, 0)],
            vec![],
            vec![],
        );
        assert!(evaluate(&InteractionRule, &store, &PipelineConfig::default()).is_empty());
    }
}

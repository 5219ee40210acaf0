//! Platform performance and follower growth rules

use crate::models::percent_of;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Priority};

/// Flags platforms whose average engagement rate is well above or below
/// the industry band
pub struct PerformanceRule;

impl InsightRule for PerformanceRule {
    fn id(&self) -> &'static str {
        "performance"
    }

    fn name(&self) -> &'static str {
        "Platform Performance"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let thresholds = &ctx.config.thresholds;
        let mut insights = Vec::new();

        for (platform, metrics) in ctx.engagement {
            let rate = metrics.avg_engagement_rate;

            if rate > thresholds.engagement_rate_high {
                insights.push(Insight::new(
                    InsightType::Performance,
                    Priority::High,
                    format!("Excellent Engagement Rate on {}", platform),
                    format!(
                        "{} averages a {:.2}% engagement rate, above the industry average.",
                        platform, rate
                    ),
                    "Keep the current content strategy and consider posting more often.",
                ));
            } else if rate < thresholds.engagement_rate_low {
                insights.push(Insight::new(
                    InsightType::Performance,
                    Priority::Critical,
                    format!("Low Engagement Rate on {}", platform),
                    format!(
                        "{} averages a {:.2}% engagement rate, below the industry average.",
                        platform, rate
                    ),
                    "Review the content strategy and favour more interactive formats.",
                ));
            }
        }

        insights
    }
}

/// Flags exceptional or slow follower growth over the whole series
pub struct GrowthRule;

/// Percent change from the first to the last follower count of a series
pub fn follower_growth_rate(first: u64, last: u64) -> f64 {
    percent_of(last as f64 - first as f64, first as f64)
}

impl InsightRule for GrowthRule {
    fn id(&self) -> &'static str {
        "growth"
    }

    fn name(&self) -> &'static str {
        "Follower Growth"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let thresholds = &ctx.config.thresholds;
        let mut insights = Vec::new();

        for platform in ctx.store.platforms() {
            let series = ctx.store.metrics_for(&platform);
            let (Some(first), Some(last)) = (series.first(), series.last()) else {
                continue;
            };
            let growth = follower_growth_rate(first.followers, last.followers);

            if growth > thresholds.growth_rate_high {
                insights.push(Insight::new(
                    InsightType::Growth,
                    Priority::High,
                    format!("Exceptional Growth on {}", platform),
                    format!(
                        "{} grew its followers by {:.1}% over the period.",
                        platform, growth
                    ),
                    "Keep the current strategy and consider investing more in this platform.",
                ));
            } else if growth < thresholds.growth_rate_low {
                insights.push(Insight::new(
                    InsightType::Growth,
                    Priority::Medium,
                    format!("Slow Growth on {}", platform),
                    format!(
                        "{} grew its followers by only {:.1}% over the period.",
                        platform, growth
                    ),
                    "Review the content strategy and consider paid follower campaigns.",
                ));
            }
        }

        insights
    }
}

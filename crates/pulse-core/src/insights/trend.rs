//! Engagement trend and seasonality rules

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::{month_name, ratio};

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Priority};

/// Reports platforms whose engagement correlates strongly with time
pub struct TrendRule;

impl InsightRule for TrendRule {
    fn id(&self) -> &'static str {
        "trend"
    }

    fn name(&self) -> &'static str {
        "Engagement Trend"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let thresholds = &ctx.config.thresholds;
        let mut insights = Vec::new();

        for (platform, trend) in ctx.trends {
            // Undefined correlation (constant or single-row series)
            let Some(correlation) = trend.engagement_correlation else {
                continue;
            };

            if correlation > thresholds.correlation_positive {
                insights.push(Insight::new(
                    InsightType::Trend,
                    Priority::High,
                    format!("Rising Engagement on {}", platform),
                    format!(
                        "{} shows a positive engagement trend (correlation {:.2}).",
                        platform, correlation
                    ),
                    "Keep the current strategy and consider increasing posting frequency.",
                ));
            } else if correlation < thresholds.correlation_negative {
                insights.push(Insight::new(
                    InsightType::Trend,
                    Priority::Critical,
                    format!("Declining Engagement on {}", platform),
                    format!(
                        "{} shows a negative engagement trend (correlation {:.2}).",
                        platform, correlation
                    ),
                    "Review the content and engagement strategy urgently.",
                ));
            }
        }

        insights
    }
}

/// Finds the calendar months with the highest and lowest mean engagement.
///
/// Months are pooled across years and platforms.
pub struct SeasonalityRule;

/// Mean engagement per calendar month (1..=12) over all metrics rows
pub fn monthly_engagement(ctx: &AnalysisContext<'_>) -> BTreeMap<u32, f64> {
    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in &ctx.store.metrics {
        let entry = sums.entry(record.date.month()).or_default();
        entry.0 += record.engagement as f64;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(month, (sum, n))| (month, ratio(sum, n as f64)))
        .collect()
}

impl InsightRule for SeasonalityRule {
    fn id(&self) -> &'static str {
        "seasonality"
    }

    fn name(&self) -> &'static str {
        "Seasonality"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let months = monthly_engagement(ctx);

        // Ties go to the earlier month
        let best = months
            .iter()
            .reduce(|best, cur| if cur.1 > best.1 { cur } else { best });
        let worst = months
            .iter()
            .reduce(|worst, cur| if cur.1 < worst.1 { cur } else { worst });

        let (Some((&best, _)), Some((&worst, _))) = (best, worst) else {
            return vec![];
        };
        let (best, worst) = (month_name(best), month_name(worst));

        vec![Insight::new(
            InsightType::Seasonality,
            Priority::Medium,
            format!("Seasonal Peak in {}", best),
            format!(
                "{} has the highest mean engagement and {} the lowest.",
                best, worst
            ),
            format!(
                "Plan special campaigns for {} and avoid large investments in {}.",
                best, worst
            ),
        )]
    }
}

//! Aggregation engine
//!
//! Monthly growth rollups and whole-series engagement metrics per platform,
//! plus the KPI summary and overview cards built on top of them.
//! Every rate guards its denominator and resolves to 0 instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{percent_of, ratio, MetricRecord, Period};
use crate::store::MetricsStore;

/// One month of a platform's metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub period: Period,
    /// Last follower count observed in the month
    pub followers: u64,
    pub impressions: u64,
    pub reach: u64,
    pub engagement: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Percent change in followers from the previous month.
    /// `None` for the first month, which has no baseline.
    pub followers_growth: Option<f64>,
    /// engagement / reach * 100
    pub engagement_rate: f64,
    /// impressions / reach
    pub impression_reach_ratio: f64,
}

/// Whole-series engagement metrics for a platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub total_engagement: u64,
    pub total_reach: u64,
    pub total_impressions: u64,
    /// engagement / reach * 100
    pub avg_engagement_rate: f64,
    /// reach / impressions * 100
    pub avg_impression_rate: f64,
    pub likes_percentage: f64,
    pub comments_percentage: f64,
    pub shares_percentage: f64,
}

/// Headline KPIs for a platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_followers: u64,
    /// Latest month-over-month follower growth (0 with fewer than two months)
    pub followers_growth_rate: f64,
    pub avg_daily_impressions: f64,
    pub avg_daily_reach: f64,
    pub avg_daily_engagement: f64,
    pub avg_engagement_rate: f64,
    pub avg_impression_rate: f64,
}

/// Dashboard KPI cards across all platforms in a (possibly filtered) store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewKpis {
    /// Sum of each platform's latest follower count
    pub total_followers: u64,
    pub total_engagement: u64,
    pub total_reach: u64,
    pub engagement_rate: f64,
}

/// Roll a date-sorted platform series up into calendar months
pub fn monthly_growth(series: &[&MetricRecord]) -> Vec<MonthlyAggregate> {
    let mut months: BTreeMap<Period, MonthlyAggregate> = BTreeMap::new();

    for record in series {
        let period = Period::from_date(record.date);
        let month = months.entry(period).or_insert_with(|| MonthlyAggregate {
            period,
            followers: 0,
            impressions: 0,
            reach: 0,
            engagement: 0,
            likes: 0,
            comments: 0,
            shares: 0,
            followers_growth: None,
            engagement_rate: 0.0,
            impression_reach_ratio: 0.0,
        });

        // Series is date-sorted, so the last write wins
        month.followers = record.followers;
        month.impressions += record.impressions;
        month.reach += record.reach;
        month.engagement += record.engagement;
        month.likes += record.likes;
        month.comments += record.comments;
        month.shares += record.shares;
    }

    let mut rollup: Vec<MonthlyAggregate> = months.into_values().collect();
    let mut previous: Option<u64> = None;

    for month in &mut rollup {
        month.followers_growth =
            previous.map(|prev| percent_of(month.followers as f64 - prev as f64, prev as f64));
        month.engagement_rate = percent_of(month.engagement as f64, month.reach as f64);
        month.impression_reach_ratio = ratio(month.impressions as f64, month.reach as f64);
        previous = Some(month.followers);
    }

    rollup
}

/// Monthly growth rollups keyed by platform
pub fn growth_metrics(store: &MetricsStore) -> BTreeMap<String, Vec<MonthlyAggregate>> {
    store
        .platforms()
        .into_iter()
        .map(|platform| {
            let rollup = monthly_growth(&store.metrics_for(&platform));
            (platform, rollup)
        })
        .collect()
}

/// Engagement metrics over an entire series (no time bucketing).
///
/// The interaction percentages are each interaction type's share of
/// likes + comments + shares, so they sum to 100 whenever there is any
/// engagement and any interaction, and are all 0 otherwise.
pub fn series_engagement(series: &[&MetricRecord]) -> EngagementMetrics {
    let mut m = EngagementMetrics::default();
    let (mut likes, mut comments, mut shares) = (0u64, 0u64, 0u64);

    for record in series {
        m.total_engagement += record.engagement;
        m.total_reach += record.reach;
        m.total_impressions += record.impressions;
        likes += record.likes;
        comments += record.comments;
        shares += record.shares;
    }

    m.avg_engagement_rate = percent_of(m.total_engagement as f64, m.total_reach as f64);
    m.avg_impression_rate = percent_of(m.total_reach as f64, m.total_impressions as f64);

    let interactions = (likes + comments + shares) as f64;
    if m.total_engagement > 0 && interactions > 0.0 {
        m.likes_percentage = percent_of(likes as f64, interactions);
        m.comments_percentage = percent_of(comments as f64, interactions);
        m.shares_percentage = percent_of(shares as f64, interactions);
    }

    m
}

/// Engagement metrics keyed by platform
pub fn engagement_metrics(store: &MetricsStore) -> BTreeMap<String, EngagementMetrics> {
    store
        .platforms()
        .into_iter()
        .map(|platform| {
            let series = store.metrics_for(&platform);
            let zero_reach = series.iter().filter(|r| r.reach == 0).count();
            if zero_reach > 0 {
                warn!(platform = %platform, rows = zero_reach, "Rows with zero reach count as 0% engagement");
            }
            let metrics = series_engagement(&series);
            (platform, metrics)
        })
        .collect()
}

/// Headline KPIs per platform, reusing precomputed growth and engagement
pub fn kpi_summary(
    store: &MetricsStore,
    growth: &BTreeMap<String, Vec<MonthlyAggregate>>,
    engagement: &BTreeMap<String, EngagementMetrics>,
) -> BTreeMap<String, KpiSummary> {
    let mut summary = BTreeMap::new();

    for platform in store.platforms() {
        let series = store.metrics_for(&platform);
        let days = series.len() as f64;
        let mean = |f: fn(&MetricRecord) -> u64| ratio(series.iter().map(|r| f(r) as f64).sum(), days);

        let followers_growth_rate = growth
            .get(&platform)
            .filter(|months| months.len() > 1)
            .and_then(|months| months.last())
            .and_then(|m| m.followers_growth)
            .unwrap_or(0.0);

        let eng = engagement.get(&platform).cloned().unwrap_or_default();

        summary.insert(
            platform,
            KpiSummary {
                total_followers: series.last().map(|r| r.followers).unwrap_or(0),
                followers_growth_rate,
                avg_daily_impressions: mean(|r| r.impressions),
                avg_daily_reach: mean(|r| r.reach),
                avg_daily_engagement: mean(|r| r.engagement),
                avg_engagement_rate: eng.avg_engagement_rate,
                avg_impression_rate: eng.avg_impression_rate,
            },
        );
    }

    summary
}

/// KPI cards across all platforms in the store
pub fn overview(store: &MetricsStore) -> OverviewKpis {
    let total_followers = store
        .platforms()
        .iter()
        .filter_map(|p| store.metrics_for(p).last().map(|r| r.followers))
        .sum();
    let total_engagement: u64 = store.metrics.iter().map(|r| r.engagement).sum();
    let total_reach: u64 = store.metrics.iter().map(|r| r.reach).sum();

    OverviewKpis {
        total_followers,
        total_engagement,
        total_reach,
        engagement_rate: percent_of(total_engagement as f64, total_reach as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{metric, metric_with_interactions};

    fn series_store() -> MetricsStore {
        MetricsStore::new(
            vec![
                metric("2024-01-01", "Instagram", 100, 1000, 40),
                metric("2024-01-31", "Instagram", 110, 1000, 60),
                metric("2024-02-15", "Instagram", 121, 2000, 100),
                metric("2024-03-01", "Instagram", 121, 0, 0),
            ],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_monthly_growth_sorted_with_undefined_first_period() {
        let growth = growth_metrics(&series_store());
        let months = &growth["Instagram"];

        assert_eq!(months.len(), 3);
        assert!(months.windows(2).all(|w| w[0].period < w[1].period));

        assert_eq!(months[0].followers_growth, None);
        assert_eq!(months[0].followers, 110);
        assert_eq!(months[0].reach, 2000);
        assert_eq!(months[0].engagement, 100);
        assert!((months[0].engagement_rate - 5.0).abs() < 1e-9);

        let feb = months[1].followers_growth.unwrap();
        assert!((feb - 10.0).abs() < 1e-9);
        assert_eq!(months[2].followers_growth, Some(0.0));
    }

    #[test]
    fn test_monthly_growth_zero_reach_guard() {
        let growth = growth_metrics(&series_store());
        let march = &growth["Instagram"][2];
        assert_eq!(march.engagement_rate, 0.0);
        assert_eq!(march.impression_reach_ratio, 0.0);
    }

    #[test]
    fn test_growth_zero_baseline_guard() {
        let store = MetricsStore::new(
            vec![
                metric("2024-01-01", "Facebook", 0, 100, 1),
                metric("2024-02-01", "Facebook", 50, 100, 1),
            ],
            vec![],
            vec![],
        );
        let months = &growth_metrics(&store)["Facebook"];
        assert_eq!(months[1].followers_growth, Some(0.0));
    }

    #[test]
    fn test_engagement_percentages_sum_to_100() {
        let store = MetricsStore::new(
            vec![
                metric_with_interactions("2024-01-01", "Instagram", 1000, 90, 61, 17, 12),
                metric_with_interactions("2024-01-02", "Instagram", 1000, 70, 33, 29, 8),
            ],
            vec![],
            vec![],
        );
        let m = &engagement_metrics(&store)["Instagram"];
        let sum = m.likes_percentage + m.comments_percentage + m.shares_percentage;
        assert!((sum - 100.0).abs() < 1e-6);
        assert_eq!(m.total_engagement, 160);
        assert!((m.avg_engagement_rate - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_engagement_zero_total() {
        let store = MetricsStore::new(
            vec![metric_with_interactions("2024-01-01", "Instagram", 0, 0, 5, 0, 0)],
            vec![],
            vec![],
        );
        let m = &engagement_metrics(&store)["Instagram"];
        assert_eq!(m.likes_percentage, 0.0);
        assert_eq!(m.comments_percentage, 0.0);
        assert_eq!(m.shares_percentage, 0.0);
        assert_eq!(m.avg_engagement_rate, 0.0);
        assert_eq!(m.avg_impression_rate, 0.0);
    }

    #[test]
    fn test_kpi_summary() {
        let store = series_store();
        let growth = growth_metrics(&store);
        let engagement = engagement_metrics(&store);
        let kpis = kpi_summary(&store, &growth, &engagement);
        let instagram = &kpis["Instagram"];

        assert_eq!(instagram.total_followers, 121);
        assert_eq!(instagram.followers_growth_rate, 0.0);
        assert!((instagram.avg_daily_reach - 1000.0).abs() < 1e-9);
        assert!((instagram.avg_daily_engagement - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_kpi_single_month_growth_is_zero() {
        let store = MetricsStore::new(
            vec![
                metric("2024-01-01", "Facebook", 100, 100, 1),
                metric("2024-01-02", "Facebook", 200, 100, 1),
            ],
            vec![],
            vec![],
        );
        let kpis = kpi_summary(&store, &growth_metrics(&store), &engagement_metrics(&store));
        assert_eq!(kpis["Facebook"].followers_growth_rate, 0.0);
    }

    #[test]
    fn test_overview() {
        let store = MetricsStore::new(
            vec![
                metric("2024-01-01", "Instagram", 100, 1000, 60),
                metric("2024-01-02", "Instagram", 150, 1000, 40),
                metric("2024-01-01", "Facebook", 300, 2000, 20),
            ],
            vec![],
            vec![],
        );
        let cards = overview(&store);
        assert_eq!(cards.total_followers, 450);
        assert_eq!(cards.total_engagement, 120);
        assert_eq!(cards.total_reach, 4000);
        assert!((cards.engagement_rate - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_overview_empty_store() {
        assert_eq!(overview(&MetricsStore::default()), OverviewKpis::default());
    }
}

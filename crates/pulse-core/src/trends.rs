//! Trend detection
//!
//! Compares the most recent window of a platform's series with its earliest
//! window, finds its best days, and measures the linear correlation between
//! time and engagement.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::TrendConfig;
use crate::models::{percent_of, MetricRecord};
use crate::store::MetricsStore;

/// Overall direction of a platform. There is no "flat" state:
/// zero change counts as a decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Growth,
    Decline,
}

impl TrendDirection {
    pub fn from_change(percent_change: f64) -> Self {
        if percent_change > 0.0 {
            Self::Growth
        } else {
            Self::Decline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growth => "Growth",
            Self::Decline => "Decline",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPerformance {
    pub date: NaiveDate,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Percent change of mean followers, recent window vs early window
    pub follower_trend: f64,
    /// Percent change of mean engagement, recent window vs early window
    pub engagement_trend: f64,
    pub overall_trend: TrendDirection,
    pub best_performance_days: Vec<DayPerformance>,
    /// Pearson correlation of engagement against the row index.
    /// `None` when undefined (fewer than two rows or a constant series).
    pub engagement_correlation: Option<f64>,
}

/// Percent change between the mean of the last `window` values and the mean
/// of the first `window` values. Windows overlap on short series.
pub fn window_change(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = window.min(values.len());
    let early = mean(&values[..n]);
    let recent = mean(&values[values.len() - n..]);
    percent_of(recent - early, early)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Pearson correlation coefficient
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let (mx, my) = (mean(xs), mean(ys));

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Correlation between the time index (0..n-1) and engagement
pub fn engagement_correlation(series: &[&MetricRecord]) -> Option<f64> {
    let xs: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    let ys: Vec<f64> = series.iter().map(|r| r.engagement as f64).collect();
    pearson(&xs, &ys)
}

/// The `n` rows with the highest engagement rate. Ties keep input order.
pub fn best_days(series: &[&MetricRecord], n: usize) -> Vec<DayPerformance> {
    let mut days: Vec<DayPerformance> = series
        .iter()
        .map(|r| DayPerformance {
            date: r.date,
            engagement_rate: r.engagement_rate(),
        })
        .collect();
    days.sort_by(|a, b| b.engagement_rate.total_cmp(&a.engagement_rate));
    days.truncate(n);
    days
}

/// Trend signals for a single date-sorted platform series
pub fn series_trend(series: &[&MetricRecord], config: &TrendConfig) -> TrendResult {
    let followers: Vec<f64> = series.iter().map(|r| r.followers as f64).collect();
    let engagement: Vec<f64> = series.iter().map(|r| r.engagement as f64).collect();

    let follower_trend = window_change(&followers, config.window);

    TrendResult {
        follower_trend,
        engagement_trend: window_change(&engagement, config.window),
        overall_trend: TrendDirection::from_change(follower_trend),
        best_performance_days: best_days(series, config.best_days),
        engagement_correlation: engagement_correlation(series),
    }
}

/// Trend signals keyed by platform
pub fn identify_trends(store: &MetricsStore, config: &TrendConfig) -> BTreeMap<String, TrendResult> {
    store
        .platforms()
        .into_iter()
        .map(|platform| {
            let trend = series_trend(&store.metrics_for(&platform), config);
            (platform, trend)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{daily_series, metric};

    #[test]
    fn test_direction_boundary() {
        assert_eq!(TrendDirection::from_change(0.0), TrendDirection::Decline);
        assert_eq!(TrendDirection::from_change(-1.0), TrendDirection::Decline);
        assert_eq!(TrendDirection::from_change(0.01), TrendDirection::Growth);
    }

    #[test]
    fn test_window_change() {
        let values: Vec<f64> = (1..=60).map(|v| v as f64).collect();
        // early mean 15.5, recent mean 45.5
        let change = window_change(&values, 30);
        assert!((change - (30.0 / 15.5 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_window_change_short_series_overlaps() {
        let values = vec![10.0, 20.0];
        // Both windows cover the whole series
        assert_eq!(window_change(&values, 30), 0.0);
        assert_eq!(window_change(&values, 1), 100.0);
        assert_eq!(window_change(&[], 30), 0.0);
    }

    #[test]
    fn test_window_change_zero_baseline() {
        assert_eq!(window_change(&[0.0, 0.0, 5.0], 1), 0.0);
    }

    #[test]
    fn test_pearson() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let up = pearson(&xs, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((up - 1.0).abs() < 1e-12);
        let down = pearson(&xs, &[8.0, 6.0, 4.0, 2.0]).unwrap();
        assert!((down + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&xs, &[3.0, 3.0, 3.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn test_best_days_stable_ties() {
        let rows = vec![
            metric("2024-01-01", "Instagram", 10, 100, 5),
            metric("2024-01-02", "Instagram", 10, 100, 9),
            metric("2024-01-03", "Instagram", 10, 100, 5),
            metric("2024-01-04", "Instagram", 10, 0, 5),
        ];
        let refs: Vec<&MetricRecord> = rows.iter().collect();
        let days = best_days(&refs, 3);

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date.to_string(), "2024-01-02");
        assert_eq!(days[1].date.to_string(), "2024-01-01");
        assert_eq!(days[2].date.to_string(), "2024-01-03");
    }

    #[test]
    fn test_identify_trends_growth() {
        let store = daily_series("Instagram", 90, |day| (1000 + day * 10, 10_000, 300 + day * 5));
        let trends = identify_trends(&store, &TrendConfig::default());
        let trend = &trends["Instagram"];

        assert!(trend.follower_trend > 0.0);
        assert!(trend.engagement_trend > 0.0);
        assert_eq!(trend.overall_trend, TrendDirection::Growth);
        assert_eq!(trend.best_performance_days.len(), 5);
        assert!((trend.engagement_correlation.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_identify_trends_flat_is_decline() {
        let store = daily_series("Facebook", 40, |_| (5000, 10_000, 300));
        let trend = &identify_trends(&store, &TrendConfig::default())["Facebook"];

        assert_eq!(trend.follower_trend, 0.0);
        assert_eq!(trend.overall_trend, TrendDirection::Decline);
        assert_eq!(trend.engagement_correlation, None);
    }
}

//! Test utilities for pulse-core
//!
//! Record builders and a deterministic two-platform fixture shared by the
//! unit tests, the integration tests, and the CLI/server crates.

use chrono::{Days, NaiveDate};

use crate::models::{CampaignRecord, DemographicRecord, MetricRecord};
use crate::store::MetricsStore;

/// First day of every generated series
pub const SERIES_START: &str = "2024-01-01";

/// Parse a `YYYY-MM-DD` literal
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// A metrics row with impressions at twice the reach and engagement split
/// roughly 70/20/10 across likes, comments and shares
pub fn metric(
    day: &str,
    platform: &str,
    followers: u64,
    reach: u64,
    engagement: u64,
) -> MetricRecord {
    let likes = engagement * 7 / 10;
    let comments = engagement * 2 / 10;
    MetricRecord {
        date: date(day),
        platform: platform.to_string(),
        followers,
        impressions: reach * 2,
        reach,
        engagement,
        likes,
        comments,
        shares: engagement - likes - comments,
        extra_metric: None,
    }
}

/// A metrics row with explicit interaction counts
pub fn metric_with_interactions(
    day: &str,
    platform: &str,
    reach: u64,
    engagement: u64,
    likes: u64,
    comments: u64,
    shares: u64,
) -> MetricRecord {
    MetricRecord {
        likes,
        comments,
        shares,
        ..metric(day, platform, 1000, reach, engagement)
    }
}

pub fn demographic(
    platform: &str,
    age_group: &str,
    gender: &str,
    city: &str,
    interest: &str,
    engagement_rate: f64,
) -> DemographicRecord {
    DemographicRecord {
        platform: platform.to_string(),
        age_group: age_group.to_string(),
        gender: gender.to_string(),
        city: city.to_string(),
        interest: interest.to_string(),
        engagement_rate,
        time_spent_minutes: 30.0,
    }
}

pub fn campaign(
    day: &str,
    platform: &str,
    campaign_type: &str,
    roi: f64,
    cost: f64,
    conversions: u64,
) -> CampaignRecord {
    CampaignRecord {
        date: date(day),
        platform: platform.to_string(),
        campaign_type: campaign_type.to_string(),
        campaign_name: format!("{} {}", campaign_type, day),
        reach: 20_000,
        engagement: 2_000,
        cost,
        conversions,
        roi,
    }
}

/// Daily metrics rows for one platform starting at [`SERIES_START`].
///
/// `values(day)` returns `(followers, reach, engagement)` for day index `day`.
pub fn daily_series(
    platform: &str,
    days: u64,
    values: impl Fn(u64) -> (u64, u64, u64),
) -> MetricsStore {
    MetricsStore::new(series_rows(platform, days, values), vec![], vec![])
}

fn series_rows(
    platform: &str,
    days: u64,
    values: impl Fn(u64) -> (u64, u64, u64),
) -> Vec<MetricRecord> {
    let start = date(SERIES_START);
    (0..days)
        .map(|day| {
            let (followers, reach, engagement) = values(day);
            let day_date = start + Days::new(day);
            metric(
                &day_date.format("%Y-%m-%d").to_string(),
                platform,
                followers,
                reach,
                engagement,
            )
        })
        .collect()
}

/// Deterministic two-platform dataset covering every insight rule.
///
/// - Instagram: 120 days of steady follower growth and rising engagement
///   around 6.5% of reach
/// - Facebook: 120 days of flat followers and falling engagement
///   around 1.6% of reach
pub fn sample_store() -> MetricsStore {
    let mut metrics = series_rows("Facebook", 120, |d| (30_000, 50_000, 900 - 2 * d));
    metrics.extend(series_rows("Instagram", 120, |d| {
        (10_000 + 30 * d, 20_000, 1_000 + 5 * d)
    }));

    let demographics = vec![
        demographic("Instagram", "18-24", "Female", "Sao Paulo", "Fashion", 0.08),
        demographic("Instagram", "18-24", "Male", "Rio de Janeiro", "Music", 0.06),
        demographic("Instagram", "25-34", "Female", "Sao Paulo", "Fashion", 0.07),
        demographic("Facebook", "35-44", "Female", "Curitiba", "Cooking", 0.03),
        demographic("Facebook", "25-34", "Male", "Recife", "Sports", 0.02),
    ];

    let campaigns = vec![
        campaign("2024-01-15", "Instagram", "Influencer", 3.5, 2000.0, 80),
        campaign("2024-02-15", "Instagram", "Promotion", 2.0, 1500.0, 30),
        campaign("2024-03-15", "Facebook", "Promotion", 1.2, 1000.0, 10),
        campaign("2024-04-15", "Facebook", "Awareness", 0.8, 800.0, 0),
    ];

    MetricsStore::new(metrics, demographics, campaigns)
}

/// Small CSV fixtures in the on-disk input layout
pub mod fixtures {
    pub const METRICS: &str = "\
date,platform,followers,impressions,reach,engagement,likes,comments,shares,saves
2024-01-01,Instagram,1000,4000,2000,100,70,20,10,5
2024-01-02,Instagram,1010,4200,2100,120,84,24,12,
2024-01-01,Facebook,3000,9000,5000,40,28,8,4,1
2024-01-02,Facebook,3000,9100,5100,38,26,8,4,
";

    pub const DEMOGRAPHICS: &str = "\
platform,age_group,gender,city,interest,engagement_rate,time_spent_minutes
Instagram,18-24,Female,Sao Paulo,Fashion,0.08,35
Instagram,25-34,Male,Recife,Music,0.05,20
Facebook,35-44,Female,Curitiba,Cooking,0.03,15
";

    pub const CAMPAIGNS: &str = "\
date,platform,campaign_type,campaign_name,reach,engagement,cost,conversions,roi
2024-01-10,Instagram,Influencer,Summer Launch,20000,1500,1200.50,40,3.2
2024-01-20,Facebook,Promotion,Winter Sale,15000,600,800.00,0,0.9
";

    /// Write all three fixture files into `dir`
    pub fn write_all(dir: &std::path::Path) {
        use crate::import::{CAMPAIGNS_FILE, DEMOGRAPHICS_FILE, METRICS_FILE};
        std::fs::write(dir.join(METRICS_FILE), METRICS).unwrap();
        std::fs::write(dir.join(DEMOGRAPHICS_FILE), DEMOGRAPHICS).unwrap();
        std::fs::write(dir.join(CAMPAIGNS_FILE), CAMPAIGNS).unwrap();
    }
}

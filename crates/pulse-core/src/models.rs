//! Data models for Pulse
//!
//! The three input tables (platform metrics, demographic samples, campaign
//! records) plus the calendar `Period` used for monthly rollups.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A platform-specific metric that only some platforms report
/// (e.g. Instagram "saves", Facebook "clicks")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraMetric {
    pub name: String,
    pub value: u64,
}

/// One row of platform metrics: a single platform on a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub date: NaiveDate,
    pub platform: String,
    pub followers: u64,
    pub impressions: u64,
    pub reach: u64,
    pub engagement: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_metric: Option<ExtraMetric>,
}

impl MetricRecord {
    /// Engagement as a percentage of reach (0 when reach is 0)
    pub fn engagement_rate(&self) -> f64 {
        percent_of(self.engagement as f64, self.reach as f64)
    }
}

/// One sampled audience member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRecord {
    pub platform: String,
    pub age_group: String,
    pub gender: String,
    pub city: String,
    pub interest: String,
    /// Fraction of content this member engaged with (0.05 = 5%)
    pub engagement_rate: f64,
    pub time_spent_minutes: f64,
}

/// A single campaign run on a platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub platform: String,
    pub campaign_type: String,
    pub campaign_name: String,
    pub reach: u64,
    pub engagement: u64,
    pub cost: f64,
    pub conversions: u64,
    pub roi: f64,
}

impl CampaignRecord {
    /// Cost per converted user, `None` when nothing converted
    pub fn cost_per_conversion(&self) -> Option<f64> {
        if self.conversions == 0 {
            None
        } else {
            Some(self.cost / self.conversions as f64)
        }
    }
}

/// A calendar month used as the aggregation bucket for growth metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid period: {} (expected YYYY-MM)", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid period year: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid period month: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid period month: {}", s));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_ordering_and_display() {
        let jan = Period::new(2024, 1);
        let dec_prev = Period::new(2023, 12);
        assert!(dec_prev < jan);
        assert_eq!(jan.to_string(), "2024-01");
        assert_eq!("2024-01".parse::<Period>().unwrap(), jan);
        assert!("2024-13".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_serializes_as_string() {
        let json = serde_json::to_string(&Period::new(2024, 3)).unwrap();
        assert_eq!(json, "\"2024-03\"");
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(percent_of(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_engagement_rate_zero_reach() {
        let record = MetricRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            platform: "Instagram".into(),
            followers: 100,
            impressions: 0,
            reach: 0,
            engagement: 10,
            likes: 0,
            comments: 0,
            shares: 0,
            extra_metric: None,
        };
        assert_eq!(record.engagement_rate(), 0.0);
    }

    #[test]
    fn test_cost_per_conversion() {
        let campaign = CampaignRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            platform: "Facebook".into(),
            campaign_type: "Promotion".into(),
            campaign_name: "Black Friday".into(),
            reach: 1000,
            engagement: 100,
            cost: 500.0,
            conversions: 0,
            roi: 2.0,
        };
        assert_eq!(campaign.cost_per_conversion(), None);
        let campaign = CampaignRecord {
            conversions: 50,
            ..campaign
        };
        assert_eq!(campaign.cost_per_conversion(), Some(10.0));
    }
}

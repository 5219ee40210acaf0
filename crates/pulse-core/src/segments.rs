//! Audience segment and campaign breakdowns

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ratio, CampaignRecord, DemographicRecord};
use crate::store::MetricsStore;

/// How many cities/interests to keep in per-platform breakdowns
const TOP_SEGMENTS: usize = 10;
/// How many campaigns to keep in the ROI leaderboard
const TOP_CAMPAIGNS: usize = 10;

/// Mean engagement of one audience segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPerformance {
    pub segment: String,
    pub samples: usize,
    /// Mean engagement rate as a fraction (0.05 = 5%)
    pub engagement_rate: f64,
    pub time_spent_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicPerformance {
    pub age_groups: Vec<SegmentPerformance>,
    pub genders: Vec<SegmentPerformance>,
    /// Top cities by engagement rate
    pub cities: Vec<SegmentPerformance>,
    /// Top interests by engagement rate
    pub interests: Vec<SegmentPerformance>,
}

/// Mean results of one campaign type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignTypePerformance {
    pub campaign_type: String,
    pub campaigns: usize,
    pub reach: f64,
    pub engagement: f64,
    pub cost: f64,
    pub conversions: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEfficiency {
    pub campaign_name: String,
    pub cost_per_reach: f64,
    pub cost_per_engagement: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPerformance {
    pub by_type: Vec<CampaignTypePerformance>,
    pub top_by_roi: Vec<CampaignRecord>,
    pub cost_efficiency: Vec<CostEfficiency>,
}

/// Whole-audience statistics for the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicOverview {
    pub samples: usize,
    pub avg_engagement_rate: f64,
    pub avg_time_spent_minutes: f64,
    pub top_cities: Vec<SegmentPerformance>,
    pub top_interests: Vec<SegmentPerformance>,
}

/// Whole-portfolio campaign statistics for the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignOverview {
    pub campaigns: usize,
    pub avg_roi: f64,
    pub total_cost: f64,
    pub total_conversions: u64,
}

/// Mean engagement and time spent per segment, in segment-name order
pub fn segment_means<'a, I, F>(records: I, key: F) -> Vec<SegmentPerformance>
where
    I: IntoIterator<Item = &'a DemographicRecord>,
    F: Fn(&DemographicRecord) -> &str,
{
    let mut groups: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record).to_string()).or_default();
        entry.0 += 1;
        entry.1 += record.engagement_rate;
        entry.2 += record.time_spent_minutes;
    }

    groups
        .into_iter()
        .map(|(segment, (n, rate, time))| SegmentPerformance {
            segment,
            samples: n,
            engagement_rate: ratio(rate, n as f64),
            time_spent_minutes: ratio(time, n as f64),
        })
        .collect()
}

/// Sort by engagement rate descending (stable) and keep the first `n`
pub fn top_by_engagement(mut segments: Vec<SegmentPerformance>, n: usize) -> Vec<SegmentPerformance> {
    segments.sort_by(|a, b| b.engagement_rate.total_cmp(&a.engagement_rate));
    segments.truncate(n);
    segments
}

/// Segment with the most samples; ties go to the alphabetically first name
pub fn dominant_by_count(segments: &[SegmentPerformance]) -> Option<&SegmentPerformance> {
    segments
        .iter()
        .reduce(|best, s| if s.samples > best.samples { s } else { best })
}

pub fn demographic_performance(store: &MetricsStore) -> BTreeMap<String, DemographicPerformance> {
    let mut platforms: BTreeMap<String, Vec<&DemographicRecord>> = BTreeMap::new();
    for record in &store.demographics {
        platforms.entry(record.platform.clone()).or_default().push(record);
    }

    platforms
        .into_iter()
        .map(|(platform, records)| {
            let rows = || records.iter().copied();
            let performance = DemographicPerformance {
                age_groups: segment_means(rows(), |r| r.age_group.as_str()),
                genders: segment_means(rows(), |r| r.gender.as_str()),
                cities: top_by_engagement(segment_means(rows(), |r| r.city.as_str()), TOP_SEGMENTS),
                interests: top_by_engagement(
                    segment_means(rows(), |r| r.interest.as_str()),
                    TOP_SEGMENTS,
                ),
            };
            (platform, performance)
        })
        .collect()
}

fn campaign_type_means(campaigns: &[&CampaignRecord]) -> Vec<CampaignTypePerformance> {
    let mut groups: BTreeMap<&str, Vec<&CampaignRecord>> = BTreeMap::new();
    for c in campaigns {
        groups.entry(c.campaign_type.as_str()).or_default().push(c);
    }

    groups
        .into_iter()
        .map(|(campaign_type, rows)| {
            let n = rows.len() as f64;
            let mean = |f: fn(&CampaignRecord) -> f64| ratio(rows.iter().map(|c| f(c)).sum(), n);
            CampaignTypePerformance {
                campaign_type: campaign_type.to_string(),
                campaigns: rows.len(),
                reach: mean(|c| c.reach as f64),
                engagement: mean(|c| c.engagement as f64),
                cost: mean(|c| c.cost),
                conversions: mean(|c| c.conversions as f64),
                roi: mean(|c| c.roi),
            }
        })
        .collect()
}

pub fn campaign_performance(store: &MetricsStore) -> BTreeMap<String, CampaignPerformance> {
    let mut platforms: BTreeMap<String, Vec<&CampaignRecord>> = BTreeMap::new();
    for record in &store.campaigns {
        platforms.entry(record.platform.clone()).or_default().push(record);
    }

    platforms
        .into_iter()
        .map(|(platform, campaigns)| {
            let mut top_by_roi: Vec<CampaignRecord> =
                campaigns.iter().map(|c| (*c).clone()).collect();
            top_by_roi.sort_by(|a, b| b.roi.total_cmp(&a.roi));
            top_by_roi.truncate(TOP_CAMPAIGNS);

            let cost_efficiency = campaigns
                .iter()
                .map(|c| CostEfficiency {
                    campaign_name: c.campaign_name.clone(),
                    cost_per_reach: ratio(c.cost, c.reach as f64),
                    cost_per_engagement: ratio(c.cost, c.engagement as f64),
                    roi: c.roi,
                })
                .collect();

            let performance = CampaignPerformance {
                by_type: campaign_type_means(&campaigns),
                top_by_roi,
                cost_efficiency,
            };
            (platform, performance)
        })
        .collect()
}

pub fn demographic_overview(store: &MetricsStore, top_n: usize) -> DemographicOverview {
    let samples = store.demographics.len();
    let n = samples as f64;

    DemographicOverview {
        samples,
        avg_engagement_rate: ratio(store.demographics.iter().map(|r| r.engagement_rate).sum(), n),
        avg_time_spent_minutes: ratio(
            store.demographics.iter().map(|r| r.time_spent_minutes).sum(),
            n,
        ),
        top_cities: top_by_engagement(segment_means(&store.demographics, |r| r.city.as_str()), top_n),
        top_interests: top_by_engagement(
            segment_means(&store.demographics, |r| r.interest.as_str()),
            top_n,
        ),
    }
}

pub fn campaign_overview(store: &MetricsStore) -> CampaignOverview {
    let campaigns = store.campaigns.len();

    CampaignOverview {
        campaigns,
        avg_roi: ratio(store.campaigns.iter().map(|c| c.roi).sum(), campaigns as f64),
        total_cost: store.campaigns.iter().map(|c| c.cost).sum(),
        total_conversions: store.campaigns.iter().map(|c| c.conversions).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{campaign, demographic};

    fn store() -> MetricsStore {
        MetricsStore::new(
            vec![],
            vec![
                demographic("Instagram", "18-24", "Female", "Recife", "Music", 0.06),
                demographic("Instagram", "18-24", "Male", "Recife", "Travel", 0.04),
                demographic("Instagram", "25-34", "Female", "Manaus", "Music", 0.02),
                demographic("Facebook", "35-44", "Male", "Curitiba", "Fitness", 0.07),
            ],
            vec![
                campaign("2024-01-05", "Instagram", "Promotion", 2.0, 1000.0, 100),
                campaign("2024-02-05", "Instagram", "Promotion", 3.0, 2000.0, 100),
                campaign("2024-03-05", "Instagram", "Seasonal", 3.5, 500.0, 10),
            ],
        )
    }

    #[test]
    fn test_segment_means() {
        let store = store();
        let perf = demographic_performance(&store);
        let instagram = &perf["Instagram"];

        assert_eq!(instagram.age_groups.len(), 2);
        assert_eq!(instagram.age_groups[0].segment, "18-24");
        assert_eq!(instagram.age_groups[0].samples, 2);
        assert!((instagram.age_groups[0].engagement_rate - 0.05).abs() < 1e-12);

        assert_eq!(instagram.cities[0].segment, "Recife");
        assert_eq!(perf["Facebook"].genders[0].segment, "Male");
    }

    #[test]
    fn test_dominant_by_count_ties_alphabetical() {
        let store = store();
        let genders = segment_means(
            store.demographics.iter().filter(|r| r.platform == "Instagram"),
            |r| r.gender.as_str(),
        );
        assert_eq!(dominant_by_count(&genders).unwrap().segment, "Female");

        let cities = segment_means(
            [&store.demographics[0], &store.demographics[2]],
            |r| r.city.as_str(),
        );
        // One sample each: Manaus sorts first
        assert_eq!(dominant_by_count(&cities).unwrap().segment, "Manaus");
        assert!(dominant_by_count(&[]).is_none());
    }

    #[test]
    fn test_campaign_performance() {
        let perf = campaign_performance(&store());
        let instagram = &perf["Instagram"];

        assert_eq!(instagram.by_type.len(), 2);
        let promotion = &instagram.by_type[0];
        assert_eq!(promotion.campaign_type, "Promotion");
        assert_eq!(promotion.campaigns, 2);
        assert!((promotion.roi - 2.5).abs() < 1e-12);
        assert!((promotion.cost - 1500.0).abs() < 1e-12);

        assert_eq!(instagram.top_by_roi[0].campaign_type, "Seasonal");
        assert_eq!(instagram.cost_efficiency.len(), 3);
    }

    #[test]
    fn test_overviews() {
        let store = store();
        let demo = demographic_overview(&store, 2);
        assert_eq!(demo.samples, 4);
        assert!((demo.avg_engagement_rate - 0.0475).abs() < 1e-12);
        assert_eq!(demo.top_cities.len(), 2);
        assert_eq!(demo.top_cities[0].segment, "Curitiba");

        let campaigns = campaign_overview(&store);
        assert_eq!(campaigns.campaigns, 3);
        assert_eq!(campaigns.total_conversions, 210);
        assert!((campaigns.total_cost - 3500.0).abs() < 1e-9);
    }

    #[test]
    fn test_overviews_empty() {
        let empty = MetricsStore::default();
        assert_eq!(demographic_overview(&empty, 5), DemographicOverview::default());
        assert_eq!(campaign_overview(&empty), CampaignOverview::default());
    }
}

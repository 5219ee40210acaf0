//! Campaign return and cost efficiency rule

use std::collections::BTreeMap;

use crate::models::{ratio, CampaignRecord};

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Priority};

/// Finds the campaign type and platform with the best mean ROI, and the
/// platform with the lowest mean cost per conversion
pub struct CampaignRule;

/// Group key -> mean of `value` over the rows where it is defined.
///
/// Keys whose rows all return `None` are left out.
fn group_means<'a>(
    campaigns: &'a [CampaignRecord],
    key: impl Fn(&'a CampaignRecord) -> &'a str,
    value: impl Fn(&CampaignRecord) -> Option<f64>,
) -> BTreeMap<&'a str, f64> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for campaign in campaigns {
        if let Some(v) = value(campaign) {
            let entry = sums.entry(key(campaign)).or_default();
            entry.0 += v;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, ratio(sum, n as f64)))
        .collect()
}

/// Highest mean; ties go to the alphabetically first key
fn best<'a>(means: &BTreeMap<&'a str, f64>) -> Option<(&'a str, f64)> {
    means
        .iter()
        .map(|(k, v)| (*k, *v))
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
}

/// Lowest mean; ties go to the alphabetically first key
fn cheapest<'a>(means: &BTreeMap<&'a str, f64>) -> Option<(&'a str, f64)> {
    means
        .iter()
        .map(|(k, v)| (*k, *v))
        .reduce(|best, cur| if cur.1 < best.1 { cur } else { best })
}

impl InsightRule for CampaignRule {
    fn id(&self) -> &'static str {
        "campaign"
    }

    fn name(&self) -> &'static str {
        "Campaign Effectiveness"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let campaigns = &ctx.store.campaigns;
        if campaigns.is_empty() {
            return vec![];
        }
        let mut insights = Vec::new();

        let by_type = group_means(campaigns, |c| c.campaign_type.as_str(), |c| Some(c.roi));
        if let Some((campaign_type, roi)) = best(&by_type) {
            insights.push(Insight::new(
                InsightType::Campaign,
                Priority::High,
                format!("{} Campaigns Perform Best", campaign_type),
                format!(
                    "{} campaigns have the highest mean ROI ({:.2}).",
                    campaign_type, roi
                ),
                format!("Increase investment in {} campaigns.", campaign_type),
            ));
        }

        let by_platform = group_means(campaigns, |c| c.platform.as_str(), |c| Some(c.roi));
        if let Some((platform, roi)) = best(&by_platform) {
            insights.push(Insight::new(
                InsightType::Platform,
                Priority::High,
                format!("Best Campaign ROI: {}", platform),
                format!(
                    "{} campaigns have the highest mean ROI across platforms ({:.2}).",
                    platform, roi
                ),
                format!("Shift more of the campaign budget to {}.", platform),
            ));
        }

        let cost_per_conversion = group_means(
            campaigns,
            |c| c.platform.as_str(),
            CampaignRecord::cost_per_conversion,
        );
        if let Some((platform, cost)) = cheapest(&cost_per_conversion) {
            insights.push(Insight::new(
                InsightType::Efficiency,
                Priority::Medium,
                format!("Lowest Cost per Conversion: {}", platform),
                format!(
                    "{} converts at the lowest mean cost ({:.2} per conversion).",
                    platform, cost
                ),
                format!("Optimise {} campaigns to maximise conversions.", platform),
            ));
        }

        insights
    }
}

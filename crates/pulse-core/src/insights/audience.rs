//! Audience composition rule

use crate::models::percent_of;
use crate::segments::{dominant_by_count, segment_means, top_by_engagement};

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Priority};

/// Describes who the audience is and which segments engage most.
///
/// Age group and gender are dominant by sample count. City and interest are
/// the segments with the highest mean engagement rate.
pub struct DemographicRule;

impl InsightRule for DemographicRule {
    fn id(&self) -> &'static str {
        "demographic"
    }

    fn name(&self) -> &'static str {
        "Audience Demographics"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let records = &ctx.store.demographics;
        if records.is_empty() {
            return vec![];
        }
        let total = records.len() as f64;
        let mut insights = Vec::new();

        let ages = segment_means(records, |r| r.age_group.as_str());
        if let Some(age) = dominant_by_count(&ages) {
            insights.push(Insight::new(
                InsightType::Demographic,
                Priority::High,
                format!("Core Audience: {}", age.segment),
                format!(
                    "The {} age group makes up {:.1}% of the audience.",
                    age.segment,
                    percent_of(age.samples as f64, total)
                ),
                format!(
                    "Tailor content to the {} audience and run campaigns targeted at it.",
                    age.segment
                ),
            ));
        }

        let genders = segment_means(records, |r| r.gender.as_str());
        if let Some(gender) = dominant_by_count(&genders) {
            insights.push(Insight::new(
                InsightType::Demographic,
                Priority::Medium,
                format!("Audience Mostly {}", gender.segment),
                format!(
                    "{} members make up {:.1}% of the audience.",
                    gender.segment,
                    percent_of(gender.samples as f64, total)
                ),
                format!(
                    "Develop content for the {} audience and consider influencer partnerships.",
                    gender.segment
                ),
            ));
        }

        let cities = top_by_engagement(segment_means(records, |r| r.city.as_str()), 1);
        if let Some(city) = cities.first() {
            insights.push(Insight::new(
                InsightType::Geographic,
                Priority::Medium,
                format!("Highest-Engagement City: {}", city.segment),
                format!(
                    "{} has the highest mean engagement rate ({:.2}%).",
                    city.segment,
                    city.engagement_rate * 100.0
                ),
                format!(
                    "Consider local events in {} and geo-targeted campaigns.",
                    city.segment
                ),
            ));
        }

        let interests = top_by_engagement(segment_means(records, |r| r.interest.as_str()), 1);
        if let Some(interest) = interests.first() {
            insights.push(Insight::new(
                InsightType::Content,
                Priority::High,
                format!("Top Interest: {}", interest.segment),
                format!(
                    "Audience members interested in {} engage the most ({:.2}%).",
                    interest.segment,
                    interest.engagement_rate * 100.0
                ),
                format!("Produce more content related to {}.", interest.segment),
            ));
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::store::MetricsStore;
    use crate::test_utils::demographic;
    use std::collections::BTreeMap;

    fn evaluate(store: &MetricsStore) -> Vec<Insight> {
        let config = PipelineConfig::default();
        let (engagement, trends) = (BTreeMap::new(), BTreeMap::new());
        DemographicRule.evaluate(&AnalysisContext::new(store, &config, &engagement, &trends))
    }

    #[test]
    fn test_demographic_insights() {
        let store = MetricsStore::new(
            vec![],
            vec![
                demographic("Instagram", "25-34", "Female", "Recife", "Travel", 0.04),
                demographic("Instagram", "18-24", "Female", "Manaus", "Music", 0.09),
                demographic("TikTok", "18-24", "Male", "Recife", "Travel", 0.02),
                demographic("TikTok", "18-24", "Female", "Recife", "Gaming", 0.05),
            ],
            vec![],
        );
        let insights = evaluate(&store);
        assert_eq!(insights.len(), 4);

        assert_eq!(insights[0].insight_type, InsightType::Demographic);
        assert_eq!(insights[0].priority, Priority::High);
        assert!(insights[0].title.contains("18-24"));
        assert!(insights[0].description.contains("75.0%"));

        assert_eq!(insights[1].priority, Priority::Medium);
        assert!(insights[1].title.contains("Female"));

        assert_eq!(insights[2].insight_type, InsightType::Geographic);
        assert!(insights[2].title.contains("Manaus"));
        assert!(insights[2].description.contains("9.00%"));

        assert_eq!(insights[3].insight_type, InsightType::Content);
        assert_eq!(insights[3].priority, Priority::High);
        assert!(insights[3].title.contains("Music"));
    }

    #[test]
    fn test_count_ties_go_to_first_segment() {
        let store = MetricsStore::new(
            vec![],
            vec![
                demographic("Instagram", "35-44", "Male", "Recife", "Travel", 0.04),
                demographic("Instagram", "25-34", "Female", "Recife", "Travel", 0.04),
            ],
            vec![],
        );
        let insights = evaluate(&store);
        assert!(insights[0].title.contains("25-34"));
        assert!(insights[1].title.contains("Female"));
    }

    #[test]
    fn test_no_demographics() {
        assert!(evaluate(&MetricsStore::default()).is_empty());
    }
}

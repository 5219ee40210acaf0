//! Recommendation planner
//!
//! Turns the ranked insight list into short, medium and long-term actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RecommendationConfig;
use crate::insights::{Insight, Priority};

/// Expected impact of a recommended action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub justification: String,
    pub expected_impact: Impact,
}

impl Recommendation {
    fn from_insight(insight: &Insight, expected_impact: Impact) -> Self {
        Self {
            action: insight.recommendation.clone(),
            justification: insight.description.clone(),
            expected_impact,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub short_term: Vec<Recommendation>,
    pub medium_term: Vec<Recommendation>,
    pub long_term: Vec<Recommendation>,
}

impl Recommendations {
    pub fn len(&self) -> usize {
        self.short_term.len() + self.medium_term.len() + self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strategic actions that apply regardless of the data
pub fn long_term_actions() -> Vec<Recommendation> {
    vec![
        Recommendation {
            action: "Develop an integrated multichannel content strategy".to_string(),
            justification: "Performance differs across platforms".to_string(),
            expected_impact: Impact::High,
        },
        Recommendation {
            action: "Implement a sentiment analysis system".to_string(),
            justification: "Continuous monitoring of audience sentiment can optimise engagement"
                .to_string(),
            expected_impact: Impact::Medium,
        },
        Recommendation {
            action: "Create a micro and nano influencer program".to_string(),
            justification: "Demographic data shows specific audience opportunities".to_string(),
            expected_impact: Impact::High,
        },
    ]
}

/// Split insights into horizons.
///
/// - short term: the first `per_horizon` Critical/High insights, with High
///   impact for Critical and Medium impact for High
/// - medium term: the first `per_horizon` Medium insights, Medium impact
/// - long term: the fixed strategic actions
///
/// Insights are ranked by priority first (stable), so callers may pass an
/// unsorted list. Low insights never become recommendations. Horizons are
/// not padded when there are too few insights.
pub fn plan(insights: &[Insight], config: &RecommendationConfig) -> Recommendations {
    let mut ranked: Vec<&Insight> = insights.iter().collect();
    ranked.sort_by_key(|i| i.priority.rank());

    let short_term = ranked
        .iter()
        .filter(|i| matches!(i.priority, Priority::Critical | Priority::High))
        .take(config.per_horizon)
        .map(|i| {
            let impact = if i.priority == Priority::Critical {
                Impact::High
            } else {
                Impact::Medium
            };
            Recommendation::from_insight(i, impact)
        })
        .collect();

    let medium_term = ranked
        .iter()
        .filter(|i| i.priority == Priority::Medium)
        .take(config.per_horizon)
        .map(|i| Recommendation::from_insight(i, Impact::Medium))
        .collect();

    Recommendations {
        short_term,
        medium_term,
        long_term: long_term_actions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightType;

    fn insight(priority: Priority, n: usize) -> Insight {
        Insight::new(
            InsightType::Performance,
            priority,
            format!("insight {}", n),
            format!("why {}", n),
            format!("do {}", n),
        )
    }

    #[test]
    fn test_plan_limits_and_impacts() {
        let insights = vec![
            insight(Priority::Critical, 1),
            insight(Priority::High, 2),
            insight(Priority::High, 3),
            insight(Priority::High, 4),
            insight(Priority::Medium, 5),
            insight(Priority::Medium, 6),
            insight(Priority::Medium, 7),
            insight(Priority::Medium, 8),
            insight(Priority::Low, 9),
        ];
        let plan = plan(&insights, &RecommendationConfig::default());

        assert_eq!(plan.short_term.len(), 3);
        assert_eq!(plan.short_term[0].action, "do 1");
        assert_eq!(plan.short_term[0].justification, "why 1");
        assert_eq!(plan.short_term[0].expected_impact, Impact::High);
        assert_eq!(plan.short_term[1].expected_impact, Impact::Medium);
        assert_eq!(plan.short_term[2].action, "do 3");

        assert_eq!(plan.medium_term.len(), 3);
        assert_eq!(plan.medium_term[0].action, "do 5");
        assert!(plan
            .medium_term
            .iter()
            .all(|r| r.expected_impact == Impact::Medium));

        assert_eq!(plan.long_term, long_term_actions());
        assert_eq!(plan.len(), 9);
    }

    #[test]
    fn test_plan_does_not_pad() {
        let plan = plan(&[insight(Priority::High, 1)], &RecommendationConfig::default());
        assert_eq!(plan.short_term.len(), 1);
        assert!(plan.medium_term.is_empty());
        assert_eq!(plan.long_term.len(), 3);
    }

    #[test]
    fn test_plan_no_insights() {
        let plan = plan(&[], &RecommendationConfig::default());
        assert!(plan.short_term.is_empty());
        assert!(plan.medium_term.is_empty());
        assert_eq!(plan.long_term.len(), 3);
    }

    #[test]
    fn test_plan_ranks_unsorted_input() {
        let insights = vec![
            insight(Priority::High, 1),
            insight(Priority::Low, 2),
            insight(Priority::Critical, 3),
        ];
        let plan = plan(&insights, &RecommendationConfig::default());
        assert_eq!(plan.short_term[0].action, "do 3");
        assert_eq!(plan.short_term[1].action, "do 1");
    }

    #[test]
    fn test_long_term_impacts() {
        let impacts: Vec<Impact> = long_term_actions()
            .iter()
            .map(|r| r.expected_impact)
            .collect();
        assert_eq!(impacts, vec![Impact::High, Impact::Medium, Impact::High]);
    }
}

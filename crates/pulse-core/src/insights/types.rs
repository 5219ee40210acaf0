//! Core types for the insight generator

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Performance,
    Growth,
    Demographic,
    Geographic,
    Content,
    Campaign,
    Platform,
    Efficiency,
    Trend,
    Seasonality,
    Interaction,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Performance => "performance",
            InsightType::Growth => "growth",
            InsightType::Demographic => "demographic",
            InsightType::Geographic => "geographic",
            InsightType::Content => "content",
            InsightType::Campaign => "campaign",
            InsightType::Platform => "platform",
            InsightType::Efficiency => "efficiency",
            InsightType::Trend => "trend",
            InsightType::Seasonality => "seasonality",
            InsightType::Interaction => "interaction",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            InsightType::Performance => "Performance",
            InsightType::Growth => "Growth",
            InsightType::Demographic => "Demographic",
            InsightType::Geographic => "Geographic",
            InsightType::Content => "Content",
            InsightType::Campaign => "Campaign",
            InsightType::Platform => "Platform",
            InsightType::Efficiency => "Efficiency",
            InsightType::Trend => "Trend",
            InsightType::Seasonality => "Seasonality",
            InsightType::Interaction => "Interaction",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "performance" => Ok(InsightType::Performance),
            "growth" => Ok(InsightType::Growth),
            "demographic" => Ok(InsightType::Demographic),
            "geographic" => Ok(InsightType::Geographic),
            "content" => Ok(InsightType::Content),
            "campaign" => Ok(InsightType::Campaign),
            "platform" => Ok(InsightType::Platform),
            "efficiency" => Ok(InsightType::Efficiency),
            "trend" => Ok(InsightType::Trend),
            "seasonality" => Ok(InsightType::Seasonality),
            "interaction" => Ok(InsightType::Interaction),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Priority tier of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Sort rank (lower = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A generated insight. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub priority: Priority,
}

impl Insight {
    pub fn new(
        insight_type: InsightType,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            insight_type,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            priority,
        }
    }
}

/// Stable sort by priority tier, keeping generation order within a tier
pub fn sort_by_priority(insights: &mut [Insight]) {
    insights.sort_by_key(|i| i.priority.rank());
}

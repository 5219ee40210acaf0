//! Pulse Core Library
//!
//! Shared functionality for the Pulse social media analytics tool:
//! - CSV import for platform metrics, audience demographics and campaigns
//! - Monthly growth and engagement aggregation per platform
//! - Trend detection (window comparison, best days, correlation)
//! - Rule-based insight generation with priority ranking
//! - Short, medium and long-term recommendation planning
//! - Markdown and JSON report rendering
//! - Layered TOML configuration

pub mod aggregate;
pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod pipeline;
pub mod recommendations;
pub mod report;
pub mod segments;
pub mod store;
pub mod trends;

/// Record builders and sample data for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    engagement_metrics, growth_metrics, kpi_summary, overview, EngagementMetrics, KpiSummary,
    MonthlyAggregate, OverviewKpis,
};
pub use config::{
    PipelineConfig, PostingHourConfig, RecommendationConfig, ReportConfig, Thresholds, TrendConfig,
};
pub use error::{Error, Result};
pub use import::load_dir;
pub use insights::{Insight, InsightEngine, InsightType, Priority};
pub use models::{CampaignRecord, DemographicRecord, ExtraMetric, MetricRecord, Period};
pub use pipeline::{Analysis, Pipeline};
pub use recommendations::{Impact, Recommendation, Recommendations};
pub use report::{Report, ReportFormat};
pub use segments::{
    campaign_overview, campaign_performance, demographic_overview, demographic_performance,
    CampaignOverview, CampaignPerformance, DemographicOverview, DemographicPerformance,
};
pub use store::{MetricsFilter, MetricsStore};
pub use trends::{identify_trends, TrendDirection, TrendResult};

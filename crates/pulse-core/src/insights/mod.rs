//! Insight Generator - rule-based marketing insights
//!
//! Each rule inspects the store plus the precomputed engagement and trend
//! aggregates and emits zero or more [`Insight`]s. The engine concatenates
//! the rule outputs in a fixed order and stably sorts them by priority.
//!
//! ## Built-in rules
//!
//! - **Performance** - engagement rate above/below the industry band
//! - **Growth** - follower growth over the whole series
//! - **Demographic** - core audience, top city and top interest
//! - **Campaign** - best campaign type, best platform, cheapest conversions
//! - **Trend** - engagement correlated with time
//! - **Seasonality** - best and worst calendar month
//! - **Posting Hour** - seeded simulation of the best hour to post
//! - **Interaction** - dominant interaction type
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pulse_core::insights::{AnalysisContext, InsightEngine};
//!
//! let engine = InsightEngine::new();
//! let ctx = AnalysisContext::new(&store, &config, &engagement, &trends);
//! let insights = engine.analyze_all(&ctx);
//! ```

pub mod audience;
pub mod campaign;
pub mod content;
pub mod engine;
pub mod performance;
pub mod trend;
pub mod types;

pub use audience::DemographicRule;
pub use campaign::CampaignRule;
pub use content::{InteractionRule, PostingHourRule};
pub use engine::{AnalysisContext, InsightEngine, InsightRule};
pub use performance::{GrowthRule, PerformanceRule};
pub use trend::{SeasonalityRule, TrendRule};
pub use types::{sort_by_priority, Insight, InsightType, Priority};

//! Pipeline configuration
//!
//! All policy constants (insight thresholds, trend windows, the posting-hour
//! simulation seed) live here instead of in the analysis code, so callers
//! and tests can move a boundary without touching logic.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path passed by the caller (`--config`)
//! 2. An override in the user config dir (~/.config/pulse/pulse.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file fall back to the embedded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pulse.toml");

/// Thresholds that turn aggregates into insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub engagement_rate_high: f64,
    pub engagement_rate_low: f64,
    pub growth_rate_high: f64,
    pub growth_rate_low: f64,
    pub correlation_positive: f64,
    pub correlation_negative: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            engagement_rate_high: 5.0,
            engagement_rate_low: 2.0,
            growth_rate_high: 20.0,
            growth_rate_low: 5.0,
            correlation_positive: 0.5,
            correlation_negative: -0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Records in each of the early/recent comparison windows
    pub window: usize,
    /// Best-performing days reported per platform
    pub best_days: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: 30,
            best_days: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Insight-driven recommendations per horizon, at most [`MAX_PER_HORIZON`]
    pub per_horizon: usize,
}

/// Upper bound for `recommendations.per_horizon`
pub const MAX_PER_HORIZON: usize = 3;

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { per_horizon: 3 }
    }
}

/// Simulated best posting hour.
///
/// The input has no time-of-day data, so each daily row is given a random
/// hour drawn from a `StdRng` seeded with `seed`. Same seed, same answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingHourConfig {
    pub enabled: bool,
    pub seed: u64,
    pub first_hour: u32,
    /// Inclusive
    pub last_hour: u32,
}

impl Default for PostingHourConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 42,
            first_hour: 6,
            last_hour: 22,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub top_segments: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Social Media Marketing Report".to_string(),
            top_segments: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub thresholds: Thresholds,
    pub trends: TrendConfig,
    pub recommendations: RecommendationConfig,
    pub posting_hour: PostingHourConfig,
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Parse a TOML document, filling gaps with defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Resolve configuration: explicit path, then user override, then embedded
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            info!(path = %path.display(), "Loading pipeline config");
            return Self::load_file(path);
        }

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            info!(path = %path.display(), "Using pipeline config override");
            return Self::load_file(&path);
        }

        debug!("Using embedded pipeline config");
        Self::embedded()
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Location of the user override file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pulse").join("pulse.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if t.engagement_rate_low > t.engagement_rate_high {
            return Err(Error::Config(format!(
                "engagement_rate_low ({}) exceeds engagement_rate_high ({})",
                t.engagement_rate_low, t.engagement_rate_high
            )));
        }
        if t.growth_rate_low > t.growth_rate_high {
            return Err(Error::Config(format!(
                "growth_rate_low ({}) exceeds growth_rate_high ({})",
                t.growth_rate_low, t.growth_rate_high
            )));
        }
        if t.correlation_negative > t.correlation_positive {
            return Err(Error::Config(format!(
                "correlation_negative ({}) exceeds correlation_positive ({})",
                t.correlation_negative, t.correlation_positive
            )));
        }
        if self.trends.window == 0 {
            return Err(Error::Config("trends.window must be at least 1".into()));
        }
        if self.recommendations.per_horizon > MAX_PER_HORIZON {
            return Err(Error::Config(format!(
                "recommendations.per_horizon ({}) exceeds {}",
                self.recommendations.per_horizon, MAX_PER_HORIZON
            )));
        }
        let hours = &self.posting_hour;
        if hours.first_hour > hours.last_hour || hours.last_hour > 23 {
            return Err(Error::Config(format!(
                "posting_hour range {}..={} is not within 0..=23",
                hours.first_hour, hours.last_hour
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_matches_defaults() {
        let embedded = PipelineConfig::embedded().unwrap();
        assert_eq!(embedded, PipelineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [thresholds]
            engagement_rate_high = 7.5

            [posting_hour]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.engagement_rate_high, 7.5);
        assert_eq!(config.thresholds.engagement_rate_low, 2.0);
        assert_eq!(config.posting_hour.seed, 7);
        assert!(config.posting_hour.enabled);
        assert_eq!(config.trends.window, 30);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [thresholds]
            growth_rate_low = 30.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("growth_rate_low"));
    }

    #[test]
    fn test_rejects_bad_hour_range() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [posting_hour]
            last_hour = 24
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_oversized_horizon() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [recommendations]
            per_horizon = 4
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("per_horizon"));

        let config = PipelineConfig::from_toml_str("[recommendations]\nper_horizon = 3\n").unwrap();
        assert_eq!(config.recommendations.per_horizon, MAX_PER_HORIZON);
    }

    #[test]
    fn test_invalid_toml() {
        let err = PipelineConfig::from_toml_str("thresholds = 3").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse.toml");
        fs::write(&path, "[trends]\nwindow = 7\n").unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.trends.window, 7);
    }

    #[test]
    fn test_load_missing_path() {
        let err = PipelineConfig::load(Some(Path::new("/nonexistent/pulse.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}

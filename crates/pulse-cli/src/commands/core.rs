//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve the layered pipeline config
//! - `load_store` - Load the three CSV tables from the data directory
//! - `parse_filter` - Build a `MetricsFilter` from CLI flags
//! - `prepare` - All of the above plus an optional seed override

use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::import::parse_date;
use pulse_core::{MetricsFilter, MetricsStore, PipelineConfig};

/// Load the pipeline config (embedded defaults, user config, then `path`)
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = PipelineConfig::load(path).context("Failed to load config")?;
    config.validate().context("Invalid config")?;
    Ok(config)
}

pub fn load_store(data_dir: &Path) -> Result<MetricsStore> {
    pulse_core::load_dir(data_dir)
        .with_context(|| format!("Failed to load data from {}", data_dir.display()))
}

/// Build a filter from `--platform`, `--from` and `--to`
pub fn parse_filter(
    platform: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<MetricsFilter> {
    let from = from
        .map(parse_date)
        .transpose()
        .context("Invalid --from date format (use YYYY-MM-DD)")?;
    let to = to
        .map(parse_date)
        .transpose()
        .context("Invalid --to date format (use YYYY-MM-DD)")?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            anyhow::bail!("--from ({}) is after --to ({})", from, to);
        }
    }

    Ok(MetricsFilter {
        platform: platform.map(str::to_string),
        from,
        to,
    })
}

/// Load config and data, apply the seed override, and filter the store
pub fn prepare(
    data_dir: &Path,
    config_path: Option<&Path>,
    filter: &MetricsFilter,
    seed: Option<u64>,
) -> Result<(MetricsStore, PipelineConfig)> {
    let mut config = load_config(config_path)?;
    if let Some(seed) = seed {
        tracing::debug!(seed, "Overriding posting-hour seed");
        config.posting_hour.seed = seed;
    }

    let store = load_store(data_dir)?.filter(filter);
    if store.metrics.is_empty() {
        println!("⚠️  No metrics rows match the current selection.");
    }

    Ok((store, config))
}

//! Status command implementation

use std::path::Path;

use anyhow::Result;
use pulse_core::import::{CAMPAIGNS_FILE, DEMOGRAPHICS_FILE, METRICS_FILE};
use pulse_core::PipelineConfig;

use super::{load_config, load_store};

pub fn cmd_status(data_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("📊 Pulse Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Data directory: {}", data_dir.display());

    for file in [METRICS_FILE, DEMOGRAPHICS_FILE, CAMPAIGNS_FILE] {
        let path = data_dir.join(file);
        if path.exists() {
            println!("   ✅ {}", file);
        } else {
            println!("   ❌ {} (missing)", file);
        }
    }

    match config_path {
        Some(path) => println!("   Config: {}", path.display()),
        None => match PipelineConfig::user_config_path().filter(|p| p.exists()) {
            Some(path) => println!("   Config: {} (user)", path.display()),
            None => println!("   Config: built-in defaults"),
        },
    }
    let config = load_config(config_path)?;
    println!(
        "   Thresholds: engagement {}%..{}%, growth {}%..{}%",
        config.thresholds.engagement_rate_low,
        config.thresholds.engagement_rate_high,
        config.thresholds.growth_rate_low,
        config.thresholds.growth_rate_high
    );
    if config.posting_hour.enabled {
        println!("   Posting-hour simulation: seed {}", config.posting_hour.seed);
    } else {
        println!("   Posting-hour simulation: disabled");
    }

    match load_store(data_dir) {
        Ok(store) => {
            println!();
            println!("   Metrics rows:        {}", store.metrics.len());
            println!("   Demographic samples: {}", store.demographics.len());
            println!("   Campaigns:           {}", store.campaigns.len());
            let platforms = store.platforms();
            if !platforms.is_empty() {
                println!("   Platforms:           {}", platforms.join(", "));
            }
        }
        Err(e) => {
            println!();
            println!("   ❌ Error loading data: {:#}", e);
        }
    }

    println!();
    Ok(())
}

//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Pulse - Social media marketing analytics
#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "KPI, trend and insight reports for social media marketing data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory containing platform_metrics.csv, demographic_data.csv and campaign_data.csv
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Pipeline config file (TOML)
    ///
    /// Overrides the built-in defaults and the user config in the platform
    /// config directory (e.g. ~/.config/pulse/pulse.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Platform and date-range selection applied before analysis
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Only analyze this platform
    #[arg(long)]
    pub platform: Option<String>,

    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show loaded data and active configuration
    Status,

    /// Show KPI summary per platform
    Kpis {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show follower/engagement trends, best days and correlation
    Trends {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show ranked insights and recommendations
    Insights {
        #[command(flatten)]
        filter: FilterArgs,

        /// Only show insights of this priority (critical, high, medium, low)
        #[arg(long)]
        priority: Option<String>,

        /// Seed for the simulated posting-hour insight
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate a full report
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format: markdown, json
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output file (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the simulated posting-hour insight
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8050")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., a dashboard bundle)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

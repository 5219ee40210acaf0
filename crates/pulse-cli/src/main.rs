//! Pulse CLI - Social media marketing analytics
//!
//! Usage:
//!   pulse status                      Show loaded data and config
//!   pulse kpis --platform Instagram   KPI summary per platform
//!   pulse insights --priority high    Ranked insights and recommendations
//!   pulse report --output report.md   Write a Markdown report
//!   pulse serve --port 8050           Start the API server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let data_dir = cli.data_dir.as_path();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Status => commands::cmd_status(data_dir, config),
        Commands::Kpis { filter } => {
            let filter = to_filter(&filter)?;
            commands::cmd_kpis(data_dir, config, &filter)
        }
        Commands::Trends { filter } => {
            let filter = to_filter(&filter)?;
            commands::cmd_trends(data_dir, config, &filter)
        }
        Commands::Insights {
            filter,
            priority,
            seed,
        } => {
            let filter = to_filter(&filter)?;
            commands::cmd_insights(data_dir, config, &filter, priority.as_deref(), seed)
        }
        Commands::Report {
            filter,
            format,
            output,
            seed,
        } => {
            let filter = to_filter(&filter)?;
            commands::cmd_report(data_dir, config, &filter, &format, output.as_deref(), seed)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(data_dir, config, &host, port, static_dir.as_deref()).await,
    }
}

fn to_filter(args: &FilterArgs) -> Result<pulse_core::MetricsFilter> {
    commands::parse_filter(
        args.platform.as_deref(),
        args.from.as_deref(),
        args.to.as_deref(),
    )
}

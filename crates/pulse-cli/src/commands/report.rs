//! Report command implementation

use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::{MetricsFilter, Pipeline, Report, ReportFormat};

use super::prepare;

pub fn cmd_report(
    data_dir: &Path,
    config_path: Option<&Path>,
    filter: &MetricsFilter,
    format: &str,
    output: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let format: ReportFormat = format
        .parse()
        .map_err(anyhow::Error::msg)
        .context("Invalid --format")?;

    let (store, config) = prepare(data_dir, config_path, filter, seed)?;
    let title = config.report.title.clone();
    let analysis = Pipeline::new(config).run(&store);
    let report = Report::new(title, &store, analysis);

    match output {
        Some(path) => {
            report
                .write(path, format)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "✅ {} report written to {} ({} insights)",
                format,
                path.display(),
                report.analysis.insights.len()
            );
        }
        None => {
            print!("{}", report.render(format)?);
        }
    }

    Ok(())
}

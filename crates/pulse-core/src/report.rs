//! Report rendering
//!
//! Renders an [`Analysis`] as Markdown for people or JSON for tools, and
//! writes it to disk atomically.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::Result;
use crate::pipeline::Analysis;
use crate::recommendations::Recommendation;
use crate::store::MetricsStore;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {} (expected markdown or json)", s)),
        }
    }
}

/// Inclusive range of dates covered by the metrics table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn of(store: &MetricsStore) -> Option<Self> {
        let from = store.metrics.iter().map(|r| r.date).min()?;
        let to = store.metrics.iter().map(|r| r.date).max()?;
        Some(Self { from, to })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub date_range: Option<DateRange>,
    pub platforms: Vec<String>,
    pub analysis: Analysis,
}

impl Report {
    pub fn new(title: impl Into<String>, store: &MetricsStore, analysis: Analysis) -> Self {
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            date_range: DateRange::of(store),
            platforms: store.platforms(),
            analysis,
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Markdown => Ok(self.to_markdown()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Write the rendered report to `path`.
    ///
    /// The content goes to a temp file in the same directory first and is
    /// then renamed over `path`, so readers never see a partial report.
    pub fn write(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = self.render(format)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(content.as_bytes())?;
        temp.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), format = %format, "Report written");
        Ok(())
    }

    pub fn to_markdown(&self) -> String {
        let a = &self.analysis;
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        if let Some(range) = self.date_range {
            out.push_str(&format!("**Period:** {} to {}  \n", range.from, range.to));
        }
        if !self.platforms.is_empty() {
            out.push_str(&format!("**Platforms:** {}\n\n", self.platforms.join(", ")));
        }

        out.push_str("## Overview\n\n");
        out.push_str("| Metric | Value |\n|---|---|\n");
        out.push_str(&format!("| Total followers | {} |\n", a.overview.total_followers));
        out.push_str(&format!("| Total engagement | {} |\n", a.overview.total_engagement));
        out.push_str(&format!("| Total reach | {} |\n", a.overview.total_reach));
        out.push_str(&format!(
            "| Engagement rate | {:.2}% |\n\n",
            a.overview.engagement_rate
        ));

        if !a.kpis.is_empty() {
            out.push_str("## Platform KPIs\n\n");
            out.push_str(
                "| Platform | Followers | Growth (last month) | Avg daily reach | Avg daily engagement | Engagement rate |\n",
            );
            out.push_str("|---|---|---|---|---|---|\n");
            for (platform, kpi) in &a.kpis {
                out.push_str(&format!(
                    "| {} | {} | {:.1}% | {:.0} | {:.0} | {:.2}% |\n",
                    platform,
                    kpi.total_followers,
                    kpi.followers_growth_rate,
                    kpi.avg_daily_reach,
                    kpi.avg_daily_engagement,
                    kpi.avg_engagement_rate
                ));
            }
            out.push('\n');
        }

        if !a.engagement.is_empty() {
            out.push_str("## Interaction Mix\n\n");
            out.push_str("| Platform | Likes | Comments | Shares |\n|---|---|---|---|\n");
            for (platform, m) in &a.engagement {
                out.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:.1}% |\n",
                    platform, m.likes_percentage, m.comments_percentage, m.shares_percentage
                ));
            }
            out.push('\n');
        }

        if !a.trends.is_empty() {
            out.push_str("## Trends\n\n");
            for (platform, t) in &a.trends {
                let correlation = t
                    .engagement_correlation
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_else(|| "n/a".to_string());
                out.push_str(&format!(
                    "- **{}**: {} (followers {:+.1}%, engagement {:+.1}%, correlation {})\n",
                    platform, t.overall_trend, t.follower_trend, t.engagement_trend, correlation
                ));
            }
            out.push('\n');
        }

        if a.demographics.samples > 0 {
            let d = &a.demographics;
            out.push_str("## Audience\n\n");
            out.push_str(&format!(
                "{} samples, mean engagement rate {:.2}%, mean time spent {:.1} min.\n\n",
                d.samples,
                d.avg_engagement_rate * 100.0,
                d.avg_time_spent_minutes
            ));
            let names = |segments: &[crate::segments::SegmentPerformance]| {
                segments
                    .iter()
                    .map(|s| s.segment.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            out.push_str(&format!("- Top cities: {}\n", names(&d.top_cities)));
            out.push_str(&format!("- Top interests: {}\n\n", names(&d.top_interests)));
        }

        if a.campaigns.campaigns > 0 {
            let c = &a.campaigns;
            out.push_str("## Campaigns\n\n");
            out.push_str(&format!(
                "{} campaigns, mean ROI {:.2}, total cost {:.2}, {} conversions.\n\n",
                c.campaigns, c.avg_roi, c.total_cost, c.total_conversions
            ));
        }

        out.push_str("## Insights\n\n");
        if a.insights.is_empty() {
            out.push_str("No insights for this data.\n\n");
        }
        for insight in &a.insights {
            out.push_str(&format!(
                "### [{}] {}\n\n*{}*  \n{}\n\n> {}\n\n",
                insight.priority.label(),
                insight.title,
                insight.insight_type.label(),
                insight.description,
                insight.recommendation
            ));
        }

        out.push_str("## Recommendations\n\n");
        let horizons: [(&str, &[Recommendation]); 3] = [
            ("Short term", a.recommendations.short_term.as_slice()),
            ("Medium term", a.recommendations.medium_term.as_slice()),
            ("Long term", a.recommendations.long_term.as_slice()),
        ];
        for (heading, items) in horizons {
            out.push_str(&format!("### {}\n\n", heading));
            if items.is_empty() {
                out.push_str("- None\n");
            }
            for r in items {
                out.push_str(&format!(
                    "- **{}** ({} impact): {}\n",
                    r.action, r.expected_impact, r.justification
                ));
            }
            out.push('\n');
        }

        out
    }
}

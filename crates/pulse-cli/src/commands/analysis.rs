//! Analysis command implementations (kpis, trends, insights)

use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::insights::{Insight, Priority};
use pulse_core::recommendations::Recommendation;
use pulse_core::{MetricsFilter, Pipeline, TrendDirection};

use super::{prepare, truncate};

pub fn cmd_kpis(data_dir: &Path, config_path: Option<&Path>, filter: &MetricsFilter) -> Result<()> {
    let (store, config) = prepare(data_dir, config_path, filter, None)?;
    let analysis = Pipeline::new(config).run(&store);

    println!();
    println!("📈 KPI Summary");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total followers:  {}", analysis.overview.total_followers);
    println!("   Total engagement: {}", analysis.overview.total_engagement);
    println!("   Total reach:      {}", analysis.overview.total_reach);
    println!("   Engagement rate:  {:.2}%", analysis.overview.engagement_rate);

    for (platform, kpi) in &analysis.kpis {
        println!();
        println!("   {}", platform);
        println!("      Followers:            {}", kpi.total_followers);
        println!("      Growth (last month):  {:.1}%", kpi.followers_growth_rate);
        println!("      Avg daily impressions: {:.0}", kpi.avg_daily_impressions);
        println!("      Avg daily reach:      {:.0}", kpi.avg_daily_reach);
        println!("      Avg daily engagement: {:.0}", kpi.avg_daily_engagement);
        println!("      Engagement rate:      {:.2}%", kpi.avg_engagement_rate);
        println!("      Impression rate:      {:.2}%", kpi.avg_impression_rate);
        if let Some(trend) = analysis.trends.get(platform) {
            let icon = match trend.overall_trend {
                TrendDirection::Growth => "📈",
                TrendDirection::Decline => "📉",
            };
            println!("      Trend:                {} {}", icon, trend.overall_trend);
        }
    }
    println!();

    Ok(())
}

pub fn cmd_trends(
    data_dir: &Path,
    config_path: Option<&Path>,
    filter: &MetricsFilter,
) -> Result<()> {
    let (store, config) = prepare(data_dir, config_path, filter, None)?;
    let analysis = Pipeline::new(config).run(&store);

    println!();
    println!("📊 Trends");
    println!("   ─────────────────────────────────────────────────────────────");

    for (platform, trend) in &analysis.trends {
        println!();
        println!("   {} - {}", platform, trend.overall_trend);
        println!("      Follower trend:   {:+.1}%", trend.follower_trend);
        println!("      Engagement trend: {:+.1}%", trend.engagement_trend);
        match trend.engagement_correlation {
            Some(c) => println!("      Correlation:      {:.2}", c),
            None => println!("      Correlation:      n/a"),
        }
        if !trend.best_performance_days.is_empty() {
            println!("      Best days:");
            for day in &trend.best_performance_days {
                println!("         {}  {:.2}%", day.date, day.engagement_rate);
            }
        }
    }
    println!();

    Ok(())
}

/// Keep insights of one priority, or all of them
pub fn filter_by_priority(insights: &[Insight], priority: Option<Priority>) -> Vec<&Insight> {
    insights
        .iter()
        .filter(|i| priority.map_or(true, |p| i.priority == p))
        .collect()
}

fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

fn print_recommendations(title: &str, items: &[Recommendation]) {
    println!("   {}", title);
    if items.is_empty() {
        println!("      (none)");
    }
    for r in items {
        println!("      • {} [{} impact]", r.action, r.expected_impact);
        println!("        {}", truncate(&r.justification, 90));
    }
}

pub fn cmd_insights(
    data_dir: &Path,
    config_path: Option<&Path>,
    filter: &MetricsFilter,
    priority: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    let priority: Option<Priority> = priority
        .map(|p| p.parse::<Priority>().map_err(anyhow::Error::msg))
        .transpose()
        .context("Invalid --priority")?;

    let (store, config) = prepare(data_dir, config_path, filter, seed)?;
    let analysis = Pipeline::new(config).run(&store);
    let insights = filter_by_priority(&analysis.insights, priority);

    println!();
    println!("💡 Insights ({})", insights.len());
    println!("   ─────────────────────────────────────────────────────────────");
    if insights.is_empty() {
        println!("   No insights for this selection.");
    }
    for insight in &insights {
        println!();
        println!(
            "   {} [{}] {}",
            priority_icon(insight.priority),
            insight.priority.label(),
            insight.title
        );
        println!("      {}", insight.description);
        println!("      → {}", insight.recommendation);
    }

    println!();
    println!("🎯 Recommendations");
    println!("   ─────────────────────────────────────────────────────────────");
    let plan = &analysis.recommendations;
    print_recommendations("Short term", &plan.short_term);
    print_recommendations("Medium term", &plan.medium_term);
    print_recommendations("Long term", &plan.long_term);
    println!();

    Ok(())
}

//! Aggregate and segment handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState, FilterQuery};
use pulse_core::{
    campaign_performance, demographic_performance, CampaignOverview, CampaignPerformance,
    DemographicOverview, DemographicPerformance, EngagementMetrics, KpiSummary, MonthlyAggregate,
    OverviewKpis, TrendResult,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub metrics: usize,
    pub platforms: Vec<String>,
}

/// GET /api/health - Liveness and a summary of the loaded data
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        metrics: state.store.metrics.len(),
        platforms: state.store.platforms(),
    })
}

#[derive(Debug, Serialize)]
pub struct KpiResponse {
    pub overview: OverviewKpis,
    pub platforms: BTreeMap<String, KpiSummary>,
}

/// GET /api/kpis - Cross-platform overview and per-platform KPI summaries
pub async fn get_kpis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<KpiResponse>, AppError> {
    let analysis = state.analyze(&query.to_filter()?);

    Ok(Json(KpiResponse {
        overview: analysis.overview,
        platforms: analysis.kpis,
    }))
}

/// GET /api/growth - Monthly aggregates per platform
pub async fn get_growth(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<BTreeMap<String, Vec<MonthlyAggregate>>>, AppError> {
    let analysis = state.analyze(&query.to_filter()?);
    Ok(Json(analysis.growth))
}

/// GET /api/engagement - Engagement totals and interaction mix per platform
pub async fn get_engagement(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<BTreeMap<String, EngagementMetrics>>, AppError> {
    let analysis = state.analyze(&query.to_filter()?);
    Ok(Json(analysis.engagement))
}

/// GET /api/trends - Trend direction, best days and correlation per platform
pub async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<BTreeMap<String, TrendResult>>, AppError> {
    let analysis = state.analyze(&query.to_filter()?);
    Ok(Json(analysis.trends))
}

#[derive(Debug, Serialize)]
pub struct DemographicsResponse {
    pub overview: DemographicOverview,
    pub platforms: BTreeMap<String, DemographicPerformance>,
}

/// GET /api/demographics - Audience segment performance
pub async fn get_demographics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DemographicsResponse>, AppError> {
    let filter = query.to_filter()?;
    let store = state.store.filter(&filter);
    let analysis = state.pipeline.run(&store);

    Ok(Json(DemographicsResponse {
        overview: analysis.demographics,
        platforms: demographic_performance(&store),
    }))
}

#[derive(Debug, Serialize)]
pub struct CampaignsResponse {
    pub overview: CampaignOverview,
    pub platforms: BTreeMap<String, CampaignPerformance>,
}

/// GET /api/campaigns - Campaign performance by type, ROI and cost efficiency
pub async fn get_campaigns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<CampaignsResponse>, AppError> {
    let filter = query.to_filter()?;
    let store = state.store.filter(&filter);
    let analysis = state.pipeline.run(&store);

    Ok(Json(CampaignsResponse {
        overview: analysis.campaigns,
        platforms: campaign_performance(&store),
    }))
}

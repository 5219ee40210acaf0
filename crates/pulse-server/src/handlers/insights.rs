//! Insight and recommendation handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{non_empty, AppError, AppState, FilterQuery, MAX_INSIGHT_LIMIT};
use pulse_core::{Insight, InsightType, Priority, Recommendations};

/// Query parameters for listing insights
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    /// Filter by priority (critical, high, medium, low)
    pub priority: Option<String>,
    /// Filter by insight type
    pub insight_type: Option<String>,
    /// Maximum number of insights (default 20, capped at 100)
    pub limit: Option<String>,
}

const DEFAULT_LIMIT: usize = 20;

/// GET /api/insights - Ranked insights, most urgent first
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FilterQuery>,
    Query(params): Query<InsightQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let priority = non_empty(&params.priority)
        .map(str::parse::<Priority>)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;
    let insight_type = non_empty(&params.insight_type)
        .map(str::parse::<InsightType>)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;
    let limit = non_empty(&params.limit)
        .map(|v| v.trim().parse::<usize>())
        .transpose()
        .map_err(|_| AppError::bad_request("Invalid 'limit' (use a non-negative integer)"))?
        .unwrap_or(DEFAULT_LIMIT);

    let analysis = state.analyze(&filter.to_filter()?);

    let insights = analysis
        .insights
        .into_iter()
        .filter(|i| priority.map_or(true, |p| i.priority == p))
        .filter(|i| insight_type.map_or(true, |t| i.insight_type == t))
        .take(limit.min(MAX_INSIGHT_LIMIT))
        .collect();

    Ok(Json(insights))
}

/// GET /api/recommendations - Short, medium and long-term action plan
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FilterQuery>,
) -> Result<Json<Recommendations>, AppError> {
    let analysis = state.analyze(&filter.to_filter()?);
    Ok(Json(analysis.recommendations))
}

//! Report handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{non_empty, AppError, AppState, FilterQuery};
use pulse_core::{Report, ReportFormat};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Output format (json or markdown, default json)
    pub format: Option<String>,
}

/// GET /api/report - Full report for the selected platform and dates
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FilterQuery>,
    Query(params): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let format = match non_empty(&params.format) {
        Some(f) => f
            .parse::<ReportFormat>()
            .map_err(|e| AppError::bad_request(&e))?,
        None => ReportFormat::Json,
    };

    let store = state.store.filter(&filter.to_filter()?);
    let analysis = state.pipeline.run(&store);
    let report = Report::new(state.pipeline.config().report.title.clone(), &store, analysis);

    match format {
        ReportFormat::Json => Ok(Json(report).into_response()),
        ReportFormat::Markdown => {
            let body = report.render(format)?;
            Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body).into_response())
        }
    }
}

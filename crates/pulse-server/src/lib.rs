//! Pulse Web Server
//!
//! Axum-based read-only REST API for the Pulse marketing dashboard.
//!
//! The store is loaded once at startup. Every request applies its
//! platform/date filter to the store and reruns the analysis pipeline, so
//! responses always reflect the current selection.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (date filters, enum parameters, result limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use pulse_core::import::parse_date;
use pulse_core::{Analysis, MetricsFilter, MetricsStore, Pipeline, PipelineConfig};

mod handlers;

/// Maximum number of insights returned by one request
pub const MAX_INSIGHT_LIMIT: usize = 100;

/// Server configuration options
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub store: MetricsStore,
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(store: MetricsStore, config: PipelineConfig) -> Self {
        Self {
            store,
            pipeline: Pipeline::new(config),
        }
    }

    /// Run the pipeline over the filtered store
    pub fn analyze(&self, filter: &MetricsFilter) -> Analysis {
        self.pipeline.run(&self.store.filter(filter))
    }
}

/// Platform/date-range query parameters shared by the analysis endpoints
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub platform: Option<String>,
    /// Start date, inclusive (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date, inclusive (YYYY-MM-DD)
    pub to: Option<String>,
}

/// Treat a blank query value the same as an absent one
pub(crate) fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.trim().is_empty())
}

impl FilterQuery {
    pub fn to_filter(&self) -> Result<MetricsFilter, AppError> {
        let parse = |name: &str, value: Option<&str>| {
            value
                .map(parse_date)
                .transpose()
                .map_err(|_| AppError::bad_request(&format!("Invalid '{}' date (use YYYY-MM-DD)", name)))
        };
        let from = parse("from", non_empty(&self.from))?;
        let to = parse("to", non_empty(&self.to))?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::bad_request("'from' is after 'to'"));
            }
        }

        Ok(MetricsFilter {
            platform: non_empty(&self.platform).map(str::to_string),
            from,
            to,
        })
    }
}

/// Create the application router
pub fn create_router(store: MetricsStore, config: PipelineConfig, static_dir: Option<&str>) -> Router {
    create_router_with_options(store, config, static_dir, ServerConfig::default())
}

/// Create the application router with additional options
pub fn create_router_with_options(
    store: MetricsStore,
    config: PipelineConfig,
    static_dir: Option<&str>,
    server_config: ServerConfig,
) -> Router {
    info!(
        metrics = store.metrics.len(),
        demographics = store.demographics.len(),
        campaigns = store.campaigns.len(),
        "Serving metrics store"
    );

    let state = Arc::new(AppState::new(store, config));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Aggregates
        .route("/kpis", get(handlers::get_kpis))
        .route("/growth", get(handlers::get_growth))
        .route("/engagement", get(handlers::get_engagement))
        .route("/trends", get(handlers::get_trends))
        // Segments
        .route("/demographics", get(handlers::get_demographics))
        .route("/campaigns", get(handlers::get_campaigns))
        // Insights
        .route("/insights", get(handlers::list_insights))
        .route("/recommendations", get(handlers::get_recommendations))
        // Reports
        .route("/report", get(handlers::get_report));

    // Build CORS layer
    let cors = if server_config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = server_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    store: MetricsStore,
    config: PipelineConfig,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(store, config, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    store: MetricsStore,
    config: PipelineConfig,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    server_config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router_with_options(store, config, static_dir, server_config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

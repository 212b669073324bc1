//! Location API Server
//!
//! Thin HTTP front end over the resolution service: one endpoint resolves
//! post text to blurred coordinates, one reports health.

use crate::application::ResolutionService;
use crate::infrastructure::shutdown_signal;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Resolution request.
///
/// `text`/`location_values` are accepted as aliases used by older clients.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    #[serde(default, alias = "text")]
    pub tweet_text: String,
    #[serde(default, alias = "location_values")]
    pub location_context: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
    pub cache_size: usize,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<ResolutionService>,
}

impl ApiState {
    pub fn new(service: Arc<ResolutionService>) -> Self {
        Self { service }
    }
}

/// Build the API router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/extract-location", post(extract_location_handler))
        .with_state(state)
}

/// HTTP server for location resolution.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<ResolutionService>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(service),
        }
    }

    /// Run the API server until Ctrl+C or SIGTERM.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("location API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: state.service.mode().to_string(),
        cache_size: state.service.cache_size(),
    };
    Json(response)
}

async fn extract_location_handler(
    State(state): State<ApiState>,
    body: Option<Json<ExtractRequest>>,
) -> impl IntoResponse {
    let Some(Json(req)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No data provided" })),
        );
    };

    if req.tweet_text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No tweet text provided" })),
        );
    }

    match state
        .service
        .resolve(&req.tweet_text, &req.location_context)
        .await
    {
        Ok(resolution) => match serde_json::to_value(&resolution) {
            Ok(value) => (StatusCode::OK, Json(value)),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            ),
        },
        Err(e) => {
            tracing::error!("resolution failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "kind": e.kind()
                })),
            )
        }
    }
}

//! HTTP API for exposing bot metrics.

use crate::BotMetrics;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use studybot_session::SessionRegistry;

/// API state containing the metrics collector and the live registry.
#[derive(Clone)]
pub struct ApiState {
    metrics: BotMetrics,
    registry: Arc<SessionRegistry>,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(metrics: BotMetrics, registry: Arc<SessionRegistry>) -> Self {
        Self { metrics, registry }
    }
}

/// Creates the metrics API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/sessions", get(get_sessions))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Get current metrics snapshot.
async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.metrics.snapshot();
    (StatusCode::OK, Json(snapshot))
}

/// List running sessions.
async fn get_sessions(State(state): State<ApiState>) -> impl IntoResponse {
    let sessions = state.registry.active_sessions().await;
    (StatusCode::OK, Json(sessions))
}

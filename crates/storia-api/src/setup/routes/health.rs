//! Health check handlers.

use crate::state::{AppState, ProviderNames};
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub environment: String,
    pub providers: ProviderNames,
    pub pending_publishes: usize,
}

/// Service health with configured providers.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthCheckResponse {
        status: "healthy",
        environment: state.config.base.environment.clone(),
        providers: state.provider_names.clone(),
        pending_publishes: state.pending.len().await,
    })
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

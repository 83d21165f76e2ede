//! Health check handler

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use whisperd_engine::EngineHealth;

/// Health check response
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall service status ("healthy" or "degraded")
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Engine health details
    pub engine: EngineHealth,
}

/// Report service and engine health
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let engine = state.engine.health().await;

    let (code, status) = if engine.healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            service: "whisperd".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            engine,
        }),
    )
}

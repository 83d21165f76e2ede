//! API route definitions

use crate::{handlers, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

/// Build API routes with basic middleware stack
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // OpenAI-style transcription endpoint
        .route(
            "/audio/transcriptions",
            post(handlers::transcribe::handle_transcription),
        )
        .route("/", get(root_endpoint))
        .route("/api", get(api_info))
        // Apply basic middleware
        .layer(CompressionLayer::new())
}

/// Build health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Combine all routes into a single router
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(api_routes())
        .merge(health_routes())
        // Fallback handler for unknown routes
        .fallback(not_found_handler)
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> (axum::http::StatusCode, axum::Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({
            "error": "Not Found",
            "code": "ROUTE_NOT_FOUND",
            "message": "The requested endpoint does not exist"
        })),
    )
}

/// Root endpoint for basic connectivity
async fn root_endpoint() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "service": "whisperd transcription API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    }))
}

/// API info endpoint
async fn api_info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "api": "whisperd transcription API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "transcribe": "/audio/transcriptions",
            "health": "/health"
        }
    }))
}

//! `whisperd` API server library

#![forbid(unsafe_code)]

pub mod handlers;
pub mod report;
pub mod routes;
pub mod staging;
pub mod state;

pub use report::{ReportWriter, TranscriptionReport};
pub use staging::StagedAudio;
pub use state::AppState;

use axum::Router;
use std::sync::Arc;
use whisperd_core::Config;
use whisperd_core::context_error::Result;
use whisperd_engine::SttEngine;

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the application state cannot be created or fails
/// validation.
pub fn build_router(config: Config, engine: Arc<dyn SttEngine>) -> Result<Router> {
    // Allow some slack over the configured size for multipart framing; the
    // handler enforces the exact payload limit itself.
    let body_limit = usize::try_from(config.storage.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);

    let state = Arc::new(AppState::new(config, engine)?);

    // Validate the application state
    state.validate()?;

    // Build the complete router with all routes
    Ok(routes::build_router()
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state))
}

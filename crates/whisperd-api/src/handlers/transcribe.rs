//! Transcription request handler
//!
//! Drives the full request lifecycle: stage the upload to a transient
//! file, invoke the engine, persist the report artifact, release the
//! staged file, respond. The staged file is released on every exit path,
//! including engine failures.

use crate::report::TranscriptionReport;
use crate::staging::StagedAudio;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use whisperd_core::utils;
use whisperd_engine::EngineError;

/// Response for a successful transcription
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TranscriptionResponse {
    /// Full transcript text
    pub text: String,
    /// Detected language code
    pub language: String,
}

/// Response for a failed request
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    /// Whether the request was successful (always false)
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
}

/// Handle `POST /audio/transcriptions`
///
/// Accepts a multipart form with a required `file` field (binary audio)
/// and an optional `model_name` field. `model_name` is accepted for
/// OpenAI-endpoint compatibility but does not select a model: the engine
/// loaded at startup serves every request.
///
/// # Errors
///
/// * `BAD_REQUEST` - invalid multipart data, missing file field, size or
///   extension violations, invalid or corrupt audio
/// * `INTERNAL_SERVER_ERROR` - staging write failures, engine execution
///   failures
pub async fn handle_transcription(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    // Parse multipart form data with proper error handling
    let mut audio_data: Option<Vec<u8>> = None;
    let mut audio_filename: Option<String> = None;
    let mut model_name: Option<String> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or("").to_string();

                match name.as_str() {
                    "file" => {
                        audio_filename = field.file_name().map(String::from);
                        match field.bytes().await {
                            Ok(data) => audio_data = Some(data.to_vec()),
                            Err(e) => {
                                error!("Failed to read audio data: {}", e);
                                return request_error("Failed to read audio data");
                            }
                        }
                    }
                    "model_name" => {
                        if let Ok(text) = field.text().await {
                            model_name = Some(text);
                        }
                    }
                    _ => {
                        // Ignore unknown fields for client compatibility
                    }
                }
            }
            Ok(None) => {
                // No more fields - normal completion
                break;
            }
            Err(e) => {
                error!("Error parsing multipart data: {}", e);
                return request_error(&format!("Invalid multipart data: {e}"));
            }
        }
    }

    let Some(audio) = audio_data else {
        return request_error("No audio file provided");
    };

    let Some(filename) = audio_filename else {
        return request_error("Audio filename is required");
    };

    if let Some(ref requested) = model_name {
        // Informational only; never switches the loaded model
        info!(model_name = %requested, "Client requested model label");
    }

    // Validate upload size
    if audio.len() as u64 > state.config.storage.max_upload_size {
        return request_error(&format!(
            "File size exceeds maximum of {} bytes",
            state.config.storage.max_upload_size
        ));
    }

    // Validate file extension
    if !utils::validate_file_extension(&filename, &state.config.storage.allowed_extensions) {
        return request_error(&format!("File extension is not allowed for '{filename}'"));
    }

    // Stage the upload. From here on the staged file is owned by this
    // request and removed on every exit path via the handle's drop.
    let staged = match StagedAudio::stage(&state.staging_dir, &filename, &audio) {
        Ok(staged) => staged,
        Err(e) => {
            error!("Failed to stage uploaded audio: {}", e);
            return storage_error("Failed to stage uploaded audio");
        }
    };

    let started = Instant::now();

    let inference = match state.engine.transcribe(staged.path(), &state.options).await {
        Ok(inference) => inference,
        Err(e) => {
            error!("Transcription failed: {}", e);
            // Release the staged file before surfacing the failure
            drop(staged);
            return engine_error(&e);
        }
    };

    // Instant is monotonic; elapsed time cannot be negative
    let processing_time = started.elapsed().as_secs_f64();

    let transcript = inference.text();
    let report = TranscriptionReport {
        engine: state.engine.identity(),
        audio_duration: inference.duration_seconds,
        processing_time,
        transcript: transcript.clone(),
    };

    // Artifact persistence is best-effort: the transcript has already been
    // produced, so a failed side-file write must not fail the request.
    match state.reports.write(&report, &filename, &chrono::Local::now()) {
        Ok(path) => info!(path = %path.display(), "Report written"),
        Err(e) => warn!("Failed to write report: {}", e),
    }

    staged.release();

    info!(
        "TRANSCRIBED: {} | {:.2}s audio | {} chars | {:.2}s | {}",
        filename,
        inference.duration_seconds,
        report.character_count(),
        processing_time,
        inference.language
    );

    (
        StatusCode::OK,
        Json(TranscriptionResponse {
            text: transcript,
            language: inference.language,
        }),
    )
        .into_response()
}

/// Reject a malformed or invalid request
fn request_error(message: &str) -> Response {
    error!("❌ TRANSCRIPTION REJECTED: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Surface a storage failure while staging the upload
fn storage_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Map an engine failure onto an HTTP status
fn engine_error(error: &EngineError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.to_string(),
        }),
    )
        .into_response()
}

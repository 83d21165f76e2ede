//! Core engine trait implemented by transcription backends

use crate::error::EngineResult;
use crate::types::{EngineOptions, InferenceResult};
use async_trait::async_trait;
use std::path::Path;

/// Core trait for transcription engine implementations
///
/// This trait defines the interface that all inference backends must
/// implement, allowing for pluggable engines (whisper.cpp, mock, etc.).
/// Implementations are shared read-only across concurrent requests: the
/// loaded model is owned by the process and requests hold only a reference.
#[async_trait]
pub trait SttEngine: Send + Sync {
    /// Transcribe the audio file at `path`
    ///
    /// Returns segments in temporal order matching the audio. Inference is
    /// not retried on failure.
    async fn transcribe(
        &self,
        path: &Path,
        options: &EngineOptions,
    ) -> EngineResult<InferenceResult>;

    /// Check whether the engine is healthy and ready
    async fn health(&self) -> EngineHealth;

    /// Human-readable engine identity embedded in transcription reports
    fn identity(&self) -> String;

    /// Short engine name
    fn name(&self) -> &str;
}

/// Engine health status
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineHealth {
    /// Whether the engine is healthy
    pub healthy: bool,

    /// Status message
    pub status: String,

    /// Model loaded status
    pub model_loaded: bool,

    /// Last health check timestamp
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl EngineHealth {
    /// Create a healthy status
    pub fn healthy(status: impl Into<String>) -> Self {
        Self {
            healthy: true,
            status: status.into(),
            model_loaded: true,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Create an unhealthy status
    pub fn unhealthy(status: impl Into<String>) -> Self {
        Self {
            healthy: false,
            status: status.into(),
            model_loaded: false,
            checked_at: chrono::Utc::now(),
        }
    }
}

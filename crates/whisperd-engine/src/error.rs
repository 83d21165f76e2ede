//! Error types for the transcription engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during engine operations
///
/// Inference is never retried: a failed decode is reported immediately to
/// the caller, so no variant carries retry state.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Audio file not found or inaccessible
    #[error("Audio file not found or inaccessible: {path}")]
    FileNotFound {
        /// Path to the file
        path: PathBuf,
    },

    /// Invalid or corrupt audio payload
    #[error("Invalid or corrupt audio: {reason}")]
    InvalidAudio {
        /// Failure reason
        reason: String,
    },

    /// Unsupported audio sample format
    #[error("Unsupported audio format: {format}. Supported formats: {supported:?}")]
    UnsupportedFormat {
        /// Detected format
        format: String,
        /// List of supported formats
        supported: Vec<String>,
    },

    /// Model loading error
    #[error("Failed to load model {model}: {reason}")]
    ModelLoad {
        /// Model name
        model: String,
        /// Failure reason
        reason: String,
    },

    /// Decoding error during model execution
    #[error("Decoding failed: {reason}")]
    DecodeFailed {
        /// Failure reason
        reason: String,
    },

    /// Device or resource exhaustion during model execution
    #[error("Engine resources exhausted: {reason}")]
    ResourceExhausted {
        /// Failure reason
        reason: String,
    },

    /// Underlying whisper.cpp error
    #[error("Whisper backend error: {0}")]
    Backend(#[from] whisper_rs::WhisperError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an invalid audio error
    pub fn invalid_audio(reason: impl Into<String>) -> Self {
        Self::InvalidAudio {
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>, supported: Vec<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            supported,
        }
    }

    /// Create a model load error
    pub fn model_load(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode failed error
    pub fn decode_failed(reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            reason: reason.into(),
        }
    }

    /// Create a resource exhausted error
    pub fn resource_exhausted(reason: impl Into<String>) -> Self {
        Self::ResourceExhausted {
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the submitted audio rather than the
    /// engine itself
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::InvalidAudio { .. } | Self::UnsupportedFormat { .. }
        )
    }
}

// Conversions to core error types
impl From<EngineError> for whisperd_core::context_error::ContextError {
    fn from(err: EngineError) -> Self {
        Self::with_context(err, "Transcription engine error")
    }
}

impl From<EngineError> for whisperd_core::Error {
    fn from(err: EngineError) -> Self {
        Self::Transcription(err.to_string())
    }
}

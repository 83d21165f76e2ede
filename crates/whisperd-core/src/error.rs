//! Error types for the `whisperd` transcription service

use std::{error::Error as StdError, fmt};

/// Main error type for the `whisperd` transcription service
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Failed to stage an uploaded audio payload to disk
    StorageWrite {
        /// Path that could not be written
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Failed to persist a transcription report artifact
    ArtifactWrite {
        /// Path that could not be written
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Transcription engine error
    Transcription(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::StorageWrite { path, message } => {
                write!(f, "Failed to stage audio at {path}: {message}")
            }
            Self::ArtifactWrite { path, message } => {
                write!(f, "Failed to write report at {path}: {message}")
            }
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Transcription(msg) => write!(f, "Transcription error: {msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

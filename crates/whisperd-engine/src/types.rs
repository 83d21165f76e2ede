//! Core types for the transcription engine

use serde::{Deserialize, Serialize};
use whisperd_core::EngineConfig;

/// Beam width used for decoding. Fixed for all deployments, not
/// user-configurable.
pub const DEFAULT_BEAM_SIZE: usize = 5;

/// Decode strategy, resolved once from configuration when the engine is
/// constructed. Requests never override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    /// Decode the whole take with a single decoder state
    SinglePass,

    /// Decode fixed windows of audio, up to `batch_size` concurrently
    Batched {
        /// Number of windows decoded concurrently
        batch_size: usize,
    },
}

impl DecodeStrategy {
    /// Resolve the strategy from the configured batch size.
    ///
    /// A missing or zero batch size selects single-pass decoding.
    #[must_use]
    pub const fn from_batch_size(batch_size: Option<usize>) -> Self {
        match batch_size {
            Some(batch_size) if batch_size > 0 => Self::Batched { batch_size },
            _ => Self::SinglePass,
        }
    }

    /// Whether this strategy uses batched decoding
    #[must_use]
    pub const fn is_batched(&self) -> bool {
        matches!(self, Self::Batched { .. })
    }
}

impl std::fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinglePass => write!(f, "single-pass"),
            Self::Batched { batch_size } => write!(f, "batched (batch size {batch_size})"),
        }
    }
}

/// Decoding options passed to the engine
///
/// Built once from [`EngineConfig`] at startup and shared by every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Beam width for beam-search decoding
    pub beam_size: usize,

    /// Batch size for batched decoding (None = single-pass)
    pub batch_size: Option<usize>,

    /// Detect the spoken language instead of assuming one
    pub detect_language: bool,

    /// Language code hint (None for auto-detect)
    pub language: Option<String>,
}

impl EngineOptions {
    /// Build options from the process-wide engine configuration
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            beam_size: DEFAULT_BEAM_SIZE,
            batch_size: config.batch_size,
            detect_language: config.language.is_none(),
            language: config.language.clone(),
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            beam_size: DEFAULT_BEAM_SIZE,
            batch_size: None,
            detect_language: true,
            language: None,
        }
    }
}

/// A contiguous span of decoded text, in temporal order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Decoded text
    pub text: String,
}

/// Result of one inference run, immutable after production
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Decoded segments in temporal order
    pub segments: Vec<Segment>,

    /// Detected (or configured) language code
    pub language: String,

    /// Audio duration in seconds
    pub duration_seconds: f64,
}

impl InferenceResult {
    /// The canonical transcript: segment texts concatenated in order with
    /// no separator inserted.
    #[must_use]
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

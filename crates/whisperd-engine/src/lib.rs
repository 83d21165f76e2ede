//! Speech-to-text engine for the `whisperd` transcription service
//!
//! This crate provides the inference layer of the service: a pluggable
//! engine trait, a whisper.cpp backed implementation with single-pass and
//! batched decode strategies, and WAV audio decoding.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::float_cmp,
    clippy::uninlined_format_args,
    clippy::return_self_not_must_use,
    clippy::significant_drop_tightening
)]

pub mod audio;
pub mod error;
pub mod mock;
pub mod service;
pub mod types;
pub mod whisper;

pub use error::{EngineError, EngineResult};
pub use service::{EngineHealth, SttEngine};
pub use types::{
    DEFAULT_BEAM_SIZE, DecodeStrategy, EngineOptions, InferenceResult, Segment,
};

// Re-export commonly used items
pub use mock::MockEngine;
pub use whisper::WhisperEngine;

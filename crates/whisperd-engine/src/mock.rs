//! Mock transcription engine for testing

use crate::error::{EngineError, EngineResult};
use crate::service::{EngineHealth, SttEngine};
use crate::types::{EngineOptions, InferenceResult, Segment};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, sleep};

/// Mock transcription engine for testing
///
/// Returns canned segments, can be configured to fail or to delay, and
/// records the options it was invoked with so tests can assert on them.
#[derive(Debug)]
pub struct MockEngine {
    /// Canned segments returned on success
    segments: Vec<Segment>,

    /// Reported language
    language: String,

    /// Reported audio duration
    duration_seconds: f64,

    /// Artificial processing delay
    delay_ms: u64,

    /// Forced failure message
    failure: Option<String>,

    /// Options recorded per invocation
    calls: Arc<Mutex<Vec<EngineOptions>>>,
}

impl MockEngine {
    /// Create a mock engine with default canned output
    pub fn new() -> Self {
        Self {
            segments: vec![
                Segment {
                    start: 0.0,
                    end: 4.5,
                    text: " This is a mock transcription.".to_string(),
                },
                Segment {
                    start: 4.5,
                    end: 10.0,
                    text: " The audio quality was good and the speaker was clear.".to_string(),
                },
            ],
            language: "en".to_string(),
            duration_seconds: 10.0,
            delay_ms: 0,
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the canned segments
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Set the reported language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the reported audio duration
    pub const fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    /// Set an artificial processing delay
    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Configure the engine to fail every transcription
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Options recorded for each transcription call
    pub fn calls(&self) -> Vec<EngineOptions> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SttEngine for MockEngine {
    async fn transcribe(
        &self,
        _path: &Path,
        options: &EngineOptions,
    ) -> EngineResult<InferenceResult> {
        self.calls.lock().unwrap().push(options.clone());

        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if let Some(ref message) = self.failure {
            return Err(EngineError::decode_failed(message.clone()));
        }

        Ok(InferenceResult {
            segments: self.segments.clone(),
            language: self.language.clone(),
            duration_seconds: self.duration_seconds,
        })
    }

    async fn health(&self) -> EngineHealth {
        if self.failure.is_some() {
            EngineHealth::unhealthy("Mock engine configured to fail")
        } else {
            EngineHealth::healthy("Mock engine operational")
        }
    }

    fn identity(&self) -> String {
        "mock-engine (test, none)".to_string()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

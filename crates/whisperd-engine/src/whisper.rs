//! whisper.cpp backed transcription engine

use crate::audio::{self, WHISPER_SAMPLE_RATE};
use crate::error::{EngineError, EngineResult};
use crate::service::{EngineHealth, SttEngine};
use crate::types::{DecodeStrategy, EngineOptions, InferenceResult, Segment};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Window length for batched decoding, matching the model's native audio
/// context.
const BATCH_WINDOW_SECONDS: usize = 30;

/// Transcription engine backed by a whisper.cpp model
///
/// The model weights are loaded once and shared read-only across all
/// concurrent requests; each decode creates its own decoder state. The
/// decode strategy is fixed at construction from configuration.
pub struct WhisperEngine {
    /// Shared model context
    ctx: Arc<WhisperContext>,

    /// Engine identity embedded in reports
    identity: String,

    /// Decode strategy resolved from configuration
    strategy: DecodeStrategy,

    /// Decoder thread budget
    threads: i32,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("identity", &self.identity)
            .field("strategy", &self.strategy)
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

/// Engine identity string recorded in transcription reports
fn engine_identity(config: &whisperd_core::EngineConfig) -> String {
    format!(
        "whisper-{} ({}, {})",
        config.model, config.device, config.compute_type
    )
}

impl WhisperEngine {
    /// Load the model described by `config`
    ///
    /// This is done once at process startup; a failed load aborts startup
    /// rather than being deferred to the first request.
    pub fn load(config: &whisperd_core::EngineConfig) -> EngineResult<Self> {
        if !config.model_path.exists() {
            return Err(EngineError::model_load(
                &config.model,
                format!("model file not found: {}", config.model_path.display()),
            ));
        }

        let model_path = config.model_path.to_str().ok_or_else(|| {
            EngineError::model_load(&config.model, "model path is not valid UTF-8")
        })?;

        let mut ctx_params = WhisperContextParameters::default();
        let use_gpu = matches!(config.device.as_str(), "cuda" | "metal" | "gpu");
        ctx_params.use_gpu(use_gpu);

        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .map_err(|e| EngineError::model_load(&config.model, e.to_string()))?;

        let strategy = DecodeStrategy::from_batch_size(config.batch_size);
        let threads = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(4) as i32;

        info!(
            model = %config.model,
            device = %config.device,
            %strategy,
            "Loaded whisper model"
        );

        Ok(Self {
            ctx: Arc::new(ctx),
            identity: engine_identity(config),
            strategy,
            threads,
        })
    }

    /// The decode strategy this engine was constructed with
    #[must_use]
    pub const fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }
}

/// Language code handed to the decoder
///
/// With multilingual detection on, the model detects the language itself;
/// otherwise the configured hint is used, falling back to English.
fn decode_language(options: &EngineOptions) -> &str {
    if options.detect_language {
        "auto"
    } else {
        options.language.as_deref().unwrap_or("en")
    }
}

/// Decode one window of PCM with a fresh decoder state
///
/// Returns the decoded segments with `offset_seconds` applied to their
/// timestamps, plus the detected language if the model reports one.
fn decode_window(
    ctx: &WhisperContext,
    pcm: &[f32],
    options: &EngineOptions,
    threads: i32,
    offset_seconds: f64,
) -> EngineResult<(Vec<Segment>, Option<String>)> {
    let mut state = ctx.create_state()?;

    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: options.beam_size as i32,
        patience: -1.0,
    });
    params.set_n_threads(threads);
    params.set_translate(false);
    params.set_language(Some(decode_language(options)));
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    state.full(params, pcm)?;

    let segment_count = state.full_n_segments()?;
    let mut segments = Vec::with_capacity(segment_count as usize);
    for i in 0..segment_count {
        let text = state.full_get_segment_text(i)?;
        // whisper reports timestamps in centiseconds
        let start = state.full_get_segment_t0(i)? as f64 / 100.0 + offset_seconds;
        let end = state.full_get_segment_t1(i)? as f64 / 100.0 + offset_seconds;
        segments.push(Segment { start, end, text });
    }

    let language = state
        .full_lang_id()
        .ok()
        .and_then(whisper_rs::get_lang_str)
        .map(str::to_owned);

    Ok((segments, language))
}

/// Split PCM into fixed decode windows with their time offsets
fn split_windows(samples: &[f32]) -> Vec<(f64, &[f32])> {
    let window = BATCH_WINDOW_SECONDS * WHISPER_SAMPLE_RATE as usize;
    samples
        .chunks(window)
        .enumerate()
        .map(|(i, chunk)| ((i * BATCH_WINDOW_SECONDS) as f64, chunk))
        .collect()
}

/// Decode windows of audio, up to `batch_size` concurrently
///
/// Each worker creates its own decoder state against the shared context;
/// results are reassembled in temporal order.
fn decode_batched(
    ctx: &WhisperContext,
    samples: &[f32],
    options: &EngineOptions,
    threads: i32,
    batch_size: usize,
) -> EngineResult<(Vec<Segment>, Option<String>)> {
    let windows = split_windows(samples);
    let threads_per_worker = (threads / batch_size.max(1) as i32).max(1);

    let mut segments = Vec::new();
    let mut language: Option<String> = None;

    for group in windows.chunks(batch_size) {
        let results: Vec<EngineResult<(Vec<Segment>, Option<String>)>> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = group
                    .iter()
                    .map(|&(offset, chunk)| {
                        scope.spawn(move || {
                            decode_window(ctx, chunk, options, threads_per_worker, offset)
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| {
                        handle.join().unwrap_or_else(|_| {
                            Err(EngineError::resource_exhausted("decode worker panicked"))
                        })
                    })
                    .collect()
            });

        // Group order preserves temporal order across windows
        for result in results {
            let (mut window_segments, window_language) = result?;
            if language.is_none() {
                language = window_language;
            }
            segments.append(&mut window_segments);
        }
    }

    Ok((segments, language))
}

#[async_trait]
impl SttEngine for WhisperEngine {
    async fn transcribe(
        &self,
        path: &Path,
        options: &EngineOptions,
    ) -> EngineResult<InferenceResult> {
        let ctx = Arc::clone(&self.ctx);
        let options = options.clone();
        let strategy = self.strategy;
        let threads = self.threads;
        let path = path.to_path_buf();

        // Inference is CPU/accelerator bound; keep it off the async reactor
        tokio::task::spawn_blocking(move || {
            let decoded = audio::decode_wav(&path)?;
            if decoded.samples.is_empty() {
                return Err(EngineError::invalid_audio("audio contains no samples"));
            }

            debug!(
                duration = decoded.duration_seconds,
                %strategy,
                "Decoding staged audio"
            );

            let (segments, detected) = match strategy {
                DecodeStrategy::SinglePass => {
                    decode_window(&ctx, &decoded.samples, &options, threads, 0.0)?
                }
                DecodeStrategy::Batched { batch_size } => {
                    decode_batched(&ctx, &decoded.samples, &options, threads, batch_size)?
                }
            };

            let language = if options.detect_language {
                detected.unwrap_or_else(|| "en".to_string())
            } else {
                options.language.clone().unwrap_or_else(|| "en".to_string())
            };

            Ok(InferenceResult {
                segments,
                language,
                duration_seconds: decoded.duration_seconds,
            })
        })
        .await
        .map_err(|e| EngineError::resource_exhausted(format!("inference task failed: {e}")))?
    }

    async fn health(&self) -> EngineHealth {
        EngineHealth::healthy(format!("{} ready, {}", self.identity, self.strategy))
    }

    fn identity(&self) -> String {
        self.identity.clone()
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config() -> whisperd_core::EngineConfig {
        whisperd_core::Config::default().engine
    }

    #[test]
    fn test_engine_identity_format() {
        let config = test_config();
        assert_eq!(engine_identity(&config), "whisper-medium (cpu, float16)");
    }

    #[test]
    fn test_engine_identity_reflects_config() {
        let mut config = test_config();
        config.model = "large-v3".to_string();
        config.device = "cuda".to_string();
        config.compute_type = "int8".to_string();

        assert_eq!(engine_identity(&config), "whisper-large-v3 (cuda, int8)");
    }

    #[test]
    fn test_load_missing_model_fails() {
        let mut config = test_config();
        config.model_path = std::path::PathBuf::from("/nonexistent/ggml-medium.bin");

        let result = WhisperEngine::load(&config);
        assert!(matches!(result, Err(EngineError::ModelLoad { .. })));
    }

    #[test]
    fn test_split_windows_short_audio() {
        let samples = vec![0.0f32; WHISPER_SAMPLE_RATE as usize]; // one second
        let windows = split_windows(&samples);

        assert_eq!(windows.len(), 1);
        assert!(windows[0].0.abs() < f64::EPSILON);
        assert_eq!(windows[0].1.len(), WHISPER_SAMPLE_RATE as usize);
    }

    #[test]
    fn test_split_windows_offsets() {
        // 45 seconds → one full 30s window plus a 15s tail
        let samples = vec![0.0f32; 45 * WHISPER_SAMPLE_RATE as usize];
        let windows = split_windows(&samples);

        assert_eq!(windows.len(), 2);
        assert!(windows[0].0.abs() < f64::EPSILON);
        assert!((windows[1].0 - 30.0).abs() < f64::EPSILON);
        assert_eq!(windows[1].1.len(), 15 * WHISPER_SAMPLE_RATE as usize);
    }

    #[test]
    fn test_split_windows_empty() {
        let windows = split_windows(&[]);
        assert!(windows.is_empty());
    }

    #[test]
    fn test_decode_language_detection_enabled() {
        let options = EngineOptions::default();
        assert!(options.detect_language);
        assert_eq!(decode_language(&options), "auto");
    }

    #[test]
    fn test_decode_language_with_configured_hint() {
        let mut config = test_config();
        config.language = Some("fr".to_string());

        let options = EngineOptions::from_config(&config);
        assert!(!options.detect_language);
        assert_eq!(decode_language(&options), "fr");
    }

    #[test]
    fn test_decode_language_fallback_without_hint() {
        let mut options = EngineOptions::default();
        options.detect_language = false;
        options.language = None;

        assert_eq!(decode_language(&options), "en");
    }
}

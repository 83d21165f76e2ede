//! WAV decoding and sample-rate conversion for the inference engine
//!
//! whisper.cpp consumes 16 kHz mono `f32` PCM; uploads arrive as arbitrary
//! WAV files. This module bridges the two.

use crate::error::{EngineError, EngineResult};
use std::io::ErrorKind;
use std::path::Path;

/// Sample rate expected by the whisper model
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Decoded audio ready for inference
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono PCM samples at [`WHISPER_SAMPLE_RATE`]
    pub samples: Vec<f32>,

    /// Duration of the source audio in seconds
    pub duration_seconds: f64,
}

/// Decode a WAV file into 16 kHz mono `f32` PCM
///
/// The reported duration is computed from the source sample rate, before
/// resampling.
pub fn decode_wav(path: &Path) -> EngineResult<DecodedAudio> {
    let reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(ref io) if io.kind() == ErrorKind::NotFound => {
            EngineError::file_not_found(path)
        }
        other => EngineError::invalid_audio(other.to_string()),
    })?;

    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(EngineError::invalid_audio("audio declares zero channels"));
    }

    let interleaved = read_samples(reader, &spec)?;
    let mono = downmix(&interleaved, usize::from(spec.channels));
    let duration_seconds = mono.len() as f64 / f64::from(spec.sample_rate);
    let samples = resample_linear(&mono, spec.sample_rate, WHISPER_SAMPLE_RATE);

    Ok(DecodedAudio {
        samples,
        duration_seconds,
    })
}

/// Read all samples as normalized `f32` in `[-1.0, 1.0]`
fn read_samples(
    reader: hound::WavReader<std::io::BufReader<std::fs::File>>,
    spec: &hound::WavSpec,
) -> EngineResult<Vec<f32>> {
    let invalid = |e: hound::Error| EngineError::invalid_audio(e.to_string());

    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid),
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32_768.0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid),
        (hound::SampleFormat::Int, 24) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_608.0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid),
        (hound::SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid),
        (format, bits) => Err(EngineError::unsupported_format(
            format!("{bits}-bit {format:?} PCM"),
            vec![
                "16-bit Int".to_string(),
                "24-bit Int".to_string(),
                "32-bit Int".to_string(),
                "32-bit Float".to_string(),
            ],
        )),
    }
}

/// Average interleaved channels down to mono
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear-interpolation resampler
///
/// Adequate for speech input to whisper; not intended for high-fidelity
/// audio work.
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = f64::from(from_rate) / f64::from(to_rate);
    let out_len = (samples.len() as f64 / ratio).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let src = i as f64 * ratio;
            let i0 = (src.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = (src - src.floor()) as f32;
            samples[i0].mul_add(1.0 - frac, samples[i1] * frac)
        })
        .collect()
}

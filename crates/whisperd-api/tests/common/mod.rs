//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use whisperd_core::Config;
use whisperd_engine::SttEngine;

/// Multipart boundary used by the test request builders
pub const BOUNDARY: &str = "whisperd-test-boundary";

/// A router under test plus the temporary directory backing its storage
pub struct TestApp {
    pub app: Router,
    pub output_root: TempDir,
}

impl TestApp {
    /// Directory where uploads are staged
    pub fn staging_dir(&self) -> PathBuf {
        self.output_root.path().join("staging")
    }

    /// Directory where report artifacts land
    pub fn report_dir(&self) -> PathBuf {
        self.output_root.path().join("STT_output")
    }

    /// List the files currently in `dir` (empty if the dir doesn't exist)
    pub fn entries(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(std::result::Result::ok)
                    .map(|e| e.path())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Build a default test configuration rooted at `output_root`
pub fn test_config(output_root: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.output_root = output_root.path().to_path_buf();
    config
}

/// Build a router around the given engine with a default configuration
pub fn build_test_app(engine: Arc<dyn SttEngine>) -> TestApp {
    let output_root = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&output_root);
    build_test_app_with_config(engine, config, output_root)
}

/// Build a router around the given engine and configuration
pub fn build_test_app_with_config(
    engine: Arc<dyn SttEngine>,
    config: Config,
    output_root: TempDir,
) -> TestApp {
    let app = whisperd_api::build_router(config, engine).expect("Failed to build router");
    TestApp { app, output_root }
}

/// Generate an in-memory mono 16 kHz WAV file of the given length
pub fn wav_fixture(seconds: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).expect("Failed to create WAV writer");
        for _ in 0..(seconds * 16_000) {
            writer.write_sample(0i16).expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize WAV");
    }

    cursor.into_inner()
}

/// Build a multipart body with a `file` field and optional `model_name`
pub fn multipart_body(
    filename: &str,
    file_bytes: &[u8],
    model_name: Option<&str>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: audio/wav\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");

    if let Some(model) = model_name {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"model_name\"\r\n\r\n{model}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Build a multipart body that carries only a `model_name` field
pub fn multipart_body_without_file(model_name: &str) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; \
             name=\"model_name\"\r\n\r\n{model_name}\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// POST a multipart upload and return status plus parsed JSON body
pub async fn post_transcription(
    app: Router,
    content_type: &str,
    body: Vec<u8>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/audio/transcriptions")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("Failed to build request");

    send(app, request).await
}

/// Issue a GET request and return status plus parsed JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");

    send(app, request).await
}

/// Drive a request through the router and parse the JSON response
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

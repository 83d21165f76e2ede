//! Configuration management for the `whisperd` transcription service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Transcription engine configuration
    pub engine: EngineConfig,

    /// File storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Transcription engine configuration
///
/// Read once at startup and shared read-only by every request. The decode
/// mode (single-pass vs batched) is derived from `batch_size` when the
/// engine is constructed, not re-evaluated per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the ggml model weights file
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Model size label ("tiny", "base", "small", "medium", "large-v3")
    #[serde(default = "default_model")]
    pub model: String,

    /// Compute device ("cpu", "cuda", "metal")
    #[serde(default = "default_device")]
    pub device: String,

    /// Numeric precision label recorded in the engine identity
    #[serde(default = "default_compute_type")]
    pub compute_type: String,

    /// Batch size for batched decoding (absent = single-pass decoding)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    /// Language code hint (None for auto-detect)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for service data (staging and report output)
    pub output_root: PathBuf,

    /// Staging directory for uploaded audio (relative to `output_root`)
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,

    /// Maximum upload size in bytes
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,

    /// Allowed file extensions for uploads
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    9200
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/ggml-medium.bin")
}

fn default_model() -> String {
    "medium".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_compute_type() -> String {
    "float16".to_string()
}

fn default_staging_dir() -> String {
    "staging".to_string()
}

const fn default_max_upload_size() -> u64 {
    100_000_000 // 100MB
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["wav".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// Load configuration from environment and files
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("WHISPERD").separator("_"))
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        let output_root = PathBuf::from(
            std::env::var("WHISPERD_STORAGE_OUTPUT_ROOT").unwrap_or_else(|_| "./data".to_string()),
        );
        let model_path = std::env::var("WHISPERD_ENGINE_MODEL_PATH")
            .map_or_else(|_| default_model_path(), PathBuf::from);

        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            engine: EngineConfig {
                model_path,
                model: default_model(),
                device: default_device(),
                compute_type: default_compute_type(),
                batch_size: None,
                language: None,
            },
            storage: StorageConfig {
                output_root,
                staging_dir: default_staging_dir(),
                max_upload_size: default_max_upload_size(),
                allowed_extensions: default_allowed_extensions(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::field_reassign_with_default, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9200);

        assert_eq!(config.engine.model, "medium");
        assert_eq!(config.engine.device, "cpu");
        assert_eq!(config.engine.compute_type, "float16");
        assert!(config.engine.batch_size.is_none());
        assert!(config.engine.language.is_none());

        assert_eq!(config.storage.staging_dir, "staging");
        assert_eq!(config.storage.max_upload_size, 100_000_000);
        assert_eq!(config.storage.allowed_extensions, vec!["wav"]);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_server_config() {
        let server_config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 3000);
    }

    #[test]
    fn test_engine_config_batched() {
        let engine_config = EngineConfig {
            model_path: PathBuf::from("/models/ggml-large-v3.bin"),
            model: "large-v3".to_string(),
            device: "cuda".to_string(),
            compute_type: "float16".to_string(),
            batch_size: Some(8),
            language: Some("en".to_string()),
        };

        assert_eq!(engine_config.batch_size, Some(8));
        assert_eq!(engine_config.language.as_deref(), Some("en"));
        assert_eq!(engine_config.device, "cuda");
    }

    #[test]
    fn test_storage_config() {
        let storage_config = StorageConfig {
            output_root: PathBuf::from("/var/data"),
            staging_dir: "incoming".to_string(),
            max_upload_size: 50_000_000,
            allowed_extensions: vec!["wav".to_string(), "mp3".to_string()],
        };

        assert_eq!(storage_config.output_root, PathBuf::from("/var/data"));
        assert_eq!(storage_config.staging_dir, "incoming");
        assert_eq!(storage_config.max_upload_size, 50_000_000);
        assert_eq!(storage_config.allowed_extensions.len(), 2);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.server.host, config.server.host);
        assert_eq!(deserialized.server.port, config.server.port);
        assert_eq!(deserialized.engine.model, config.engine.model);
        assert_eq!(
            deserialized.storage.max_upload_size,
            config.storage.max_upload_size
        );
        assert_eq!(deserialized.logging.level, config.logging.level);
    }

    #[test]
    fn test_config_without_batch_size() {
        let config = Config::default(); // batch_size is None by default

        let serialized = serde_json::to_string(&config).unwrap();

        // When batch_size is None, it should not appear in serialized JSON
        assert!(!serialized.contains("batch_size"));

        let deserialized: Config = serde_json::from_str(&serialized).unwrap();
        assert!(deserialized.engine.batch_size.is_none());
    }

    #[test]
    fn test_config_with_batch_size() {
        let mut config = Config::default();
        config.engine.batch_size = Some(16);

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.engine.batch_size, Some(16));
    }

    #[test]
    fn test_default_value_functions() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 9200);
        assert_eq!(default_model(), "medium");
        assert_eq!(default_device(), "cpu");
        assert_eq!(default_compute_type(), "float16");
        assert_eq!(default_staging_dir(), "staging");
        assert_eq!(default_max_upload_size(), 100_000_000);
        assert_eq!(default_allowed_extensions(), vec!["wav"]);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "server": {"host": "localhost"},
            "engine": {"model": "small"},
            "storage": {"output_root": "/tmp"},
            "logging": {}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 9200); // Uses default
        assert_eq!(config.engine.model, "small");
        assert_eq!(config.engine.device, "cpu"); // Uses default
        assert_eq!(config.storage.output_root, PathBuf::from("/tmp"));
        assert_eq!(config.storage.staging_dir, "staging"); // Uses default
    }

    // Note: Environment variable tests removed due to unsafe function restrictions
    // These would require std::env::set_var and std::env::remove_var which are unsafe
    // Integration tests should be used instead to test environment variable handling

    #[test]
    fn test_config_bounds_validation() {
        let config = Config::default();

        assert!(config.server.port > 0);
        assert!(config.storage.max_upload_size > 0);
        assert!(!config.storage.allowed_extensions.is_empty());
        assert!(!config.logging.level.is_empty());
        assert!(!config.logging.format.is_empty());
        assert!(config.engine.model_path.to_str().is_some());
    }

    #[test]
    fn test_complex_config_scenario() {
        let complex_config = Config {
            server: ServerConfig {
                host: "192.168.1.100".to_string(),
                port: 9090,
            },
            engine: EngineConfig {
                model_path: PathBuf::from("/opt/models/ggml-large-v3.bin"),
                model: "large-v3".to_string(),
                device: "cuda".to_string(),
                compute_type: "float16".to_string(),
                batch_size: Some(8),
                language: None,
            },
            storage: StorageConfig {
                output_root: PathBuf::from("/data/whisperd"),
                staging_dir: "incoming".to_string(),
                max_upload_size: 500_000_000,
                allowed_extensions: vec!["wav".to_string()],
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "text".to_string(),
            },
        };

        let serialized = serde_json::to_string_pretty(&complex_config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.server.host, "192.168.1.100");
        assert_eq!(deserialized.server.port, 9090);
        assert_eq!(deserialized.engine.batch_size, Some(8));
        assert_eq!(
            deserialized.storage.output_root,
            PathBuf::from("/data/whisperd")
        );
        assert_eq!(deserialized.logging.level, "debug");
    }
}

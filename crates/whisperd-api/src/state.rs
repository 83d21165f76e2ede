//! Application state management

use crate::report::ReportWriter;
use std::path::PathBuf;
use std::sync::Arc;
use whisperd_core::{Config, context_error, context_error::Result};
use whisperd_engine::{EngineOptions, SttEngine};

/// Shared application state
///
/// The engine is loaded once per process; concurrent requests share the
/// same read-only handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Transcription engine
    pub engine: Arc<dyn SttEngine>,
    /// Decode options, built once from configuration
    pub options: EngineOptions,
    /// Staging directory for uploaded audio
    pub staging_dir: PathBuf,
    /// Report artifact writer
    pub reports: ReportWriter,
}

impl AppState {
    /// Create new application state
    ///
    /// # Errors
    ///
    /// Returns an error if the staging directory cannot be created.
    pub fn new(config: Config, engine: Arc<dyn SttEngine>) -> Result<Self> {
        let staging_dir = config
            .storage
            .output_root
            .join(&config.storage.staging_dir);

        // Ensure staging directory exists
        std::fs::create_dir_all(&staging_dir)?;

        let options = EngineOptions::from_config(&config.engine);
        let reports = ReportWriter::new(&config.storage.output_root);

        Ok(Self {
            config,
            engine,
            options,
            staging_dir,
            reports,
        })
    }

    /// Check that the application is properly configured
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        // Check that the staging directory exists and is writable
        if !self.staging_dir.exists() {
            return Err(context_error!(
                "Staging directory does not exist: {}",
                self.staging_dir.display()
            ));
        }

        // Try to create a test file to verify write permissions
        let test_file = self.staging_dir.join(".write_test");
        std::fs::write(&test_file, "test")?;
        std::fs::remove_file(&test_file)?;

        Ok(())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine.name())
            .field("staging_dir", &self.staging_dir)
            .finish_non_exhaustive()
    }
}

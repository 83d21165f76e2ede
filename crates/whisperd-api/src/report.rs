//! Transcription report artifacts
//!
//! After a successful transcription the service persists a human-readable
//! report next to the transcript. The report is a write-once artifact; it
//! is never updated after the request completes.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use whisperd_core::{Error, Result, utils};

/// Subdirectory of the output root that holds report artifacts
pub const REPORT_SUBDIR: &str = "STT_output";

const SEPARATOR_WIDTH: usize = 40;

/// Write-once transcription report
#[derive(Debug, Clone)]
pub struct TranscriptionReport {
    /// Engine identity string
    pub engine: String,

    /// Audio duration in seconds
    pub audio_duration: f64,

    /// Elapsed wall-clock processing time in seconds
    pub processing_time: f64,

    /// Full transcript text
    pub transcript: String,
}

impl TranscriptionReport {
    /// Number of characters in the transcript
    #[must_use]
    pub fn character_count(&self) -> usize {
        self.transcript.chars().count()
    }

    /// Render the report body
    ///
    /// Field order is fixed: engine identity, audio duration, character
    /// count, processing time, separator line, blank line, transcript.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Engine : {}\n\
             Audio duration : {:.2} sec\n\
             Character count : {}\n\
             Processing time : {:.2} sec\n\
             {}\n\
             \n\
             {}",
            self.engine,
            self.audio_duration,
            self.character_count(),
            self.processing_time,
            "-".repeat(SEPARATOR_WIDTH),
            self.transcript,
        )
    }
}

/// Persists transcription reports under `{output_root}/STT_output`
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at `output_root`
    #[must_use]
    pub fn new(output_root: &Path) -> Self {
        Self {
            dir: output_root.join(REPORT_SUBDIR),
        }
    }

    /// Directory reports are written to
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the output path for an upload completed at `timestamp`
    ///
    /// Two uploads with the same basename completing within the same minute
    /// share a path; the later write overwrites the earlier one.
    #[must_use]
    pub fn output_path(&self, original_filename: &str, timestamp: &DateTime<Local>) -> PathBuf {
        let basename = utils::sanitize_basename(original_filename);
        self.dir.join(format!(
            "{}_{}.txt",
            utils::report_timestamp(timestamp),
            basename
        ))
    }

    /// Persist the report, creating the output directory if absent
    ///
    /// Directory creation is idempotent and safe when concurrent requests
    /// race to create it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the report file cannot be
    /// written.
    pub fn write(
        &self,
        report: &TranscriptionReport,
        original_filename: &str,
        timestamp: &DateTime<Local>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::ArtifactWrite {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        })?;

        let path = self.output_path(original_filename, timestamp);
        fs::write(&path, report.render()).map_err(|e| Error::ArtifactWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(path)
    }
}

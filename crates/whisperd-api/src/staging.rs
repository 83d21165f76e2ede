//! Transient staging of uploaded audio
//!
//! Each request materializes its upload to a uniquely named file so the
//! inference engine can read it from disk. The file is scoped to the
//! request: exactly one staged file per request, removed on every exit
//! path.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use whisperd_core::{Error, Result, utils};

/// A staged upload, exclusively owned by the request that created it
///
/// Removal is tied to the handle itself: dropping it deletes the file, so
/// callers cannot forget cleanup on early returns or failures. Removal
/// failure is logged as a warning and never masks the request outcome.
#[derive(Debug)]
pub struct StagedAudio {
    path: PathBuf,
    released: bool,
}

impl StagedAudio {
    /// Write `bytes` to a collision-free file under `dir`
    ///
    /// The filename embeds a random UUID, so concurrent requests never
    /// collide. On write failure no file handle is returned and no cleanup
    /// is owed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the payload cannot be written
    /// (disk full, permission denied, missing directory).
    pub fn stage(dir: &Path, original_filename: &str, bytes: &[u8]) -> Result<Self> {
        let path = dir.join(utils::staging_filename(original_filename));
        fs::write(&path, bytes).map_err(|e| Error::StorageWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path,
            released: false,
        })
    }

    /// Path of the staged file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file now instead of at drop
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = fs::remove_file(&self.path) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staged audio"
            );
        }
    }
}

impl Drop for StagedAudio {
    fn drop(&mut self) {
        self.remove();
    }
}

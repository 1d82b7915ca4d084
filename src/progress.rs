//! Resume checkpoint persistence
//!
//! Exactly one checkpoint exists at a time, stored as a JSON file in the data
//! directory (~/.local/share/hlsdeck/axy_v2_progress.json on Linux). Every save
//! overwrites it.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::models::{EpisodeRef, PlaybackCheckpoint};

/// Name of the stored entry
pub const CHECKPOINT_KEY: &str = "axy_v2_progress";

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Could not determine a data directory")]
    NoDataDir,
    #[error("Checkpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Checkpoint serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed single-entry checkpoint store
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    last_timestamp: u64,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_timestamp: 0,
        }
    }

    /// Default location under the user's data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("hlsdeck").join(format!("{}.json", CHECKPOINT_KEY)))
    }

    /// Store at the default location
    pub fn open_default() -> Result<Self, ProgressError> {
        Self::default_path()
            .map(Self::new)
            .ok_or(ProgressError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the checkpoint with `target` at `time` seconds
    ///
    /// Capture timestamps never go backwards across saves from this store,
    /// even if the wall clock does.
    pub fn save(&mut self, target: &EpisodeRef, time: f64) -> Result<PlaybackCheckpoint, ProgressError> {
        let timestamp = unix_millis().max(self.last_timestamp);
        self.last_timestamp = timestamp;

        let checkpoint = PlaybackCheckpoint {
            series: target.series.clone(),
            season: target.season.clone(),
            index: target.index,
            time,
            timestamp,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&checkpoint)?;
        std::fs::write(&self.path, json)?;

        tracing::trace!(episode = %target, time, "checkpoint saved");
        Ok(checkpoint)
    }

    /// Read the checkpoint; absent or corrupt entries read as `None`
    pub fn load(&self) -> Option<PlaybackCheckpoint> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint unreadable");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(checkpoint) => Some(checkpoint),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint corrupt, ignoring");
                None
            }
        }
    }

    /// Remove the checkpoint; a missing entry is fine
    pub fn clear(&self) -> Result<(), ProgressError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("checkpoint cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

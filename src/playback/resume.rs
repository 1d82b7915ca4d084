//! Resume prompt
//!
//! Offered once after the catalog loads, and only for a checkpoint that still
//! points at an existing episode.

use crate::models::{format_time, Catalog, PlaybackCheckpoint, ResolvedSource};
use crate::progress::ProgressError;
use crate::stream::MediaElement;

use super::controller::{PlaybackController, PlaybackError};

#[derive(Debug, Clone, PartialEq)]
pub struct ResumePrompt {
    checkpoint: PlaybackCheckpoint,
    episode_name: String,
}

impl ResumePrompt {
    /// Build a prompt if `checkpoint` resolves against `catalog`
    ///
    /// Stale checkpoints yield `None` and are left in storage.
    pub fn check(catalog: &Catalog, checkpoint: Option<PlaybackCheckpoint>) -> Option<Self> {
        let checkpoint = checkpoint?;
        let Some(episode) = catalog.episode(&checkpoint.target()) else {
            tracing::debug!(episode = %checkpoint.target(), "stale checkpoint ignored");
            return None;
        };
        Some(Self {
            episode_name: episode.name.clone(),
            checkpoint,
        })
    }

    pub fn checkpoint(&self) -> &PlaybackCheckpoint {
        &self.checkpoint
    }

    pub fn episode_name(&self) -> &str {
        &self.episode_name
    }

    pub fn message(&self) -> String {
        format!(
            "Resume {} at {}?",
            self.episode_name,
            format_time(self.checkpoint.time)
        )
    }

    /// Resume playback where the checkpoint left off
    pub fn accept<M: MediaElement>(
        self,
        controller: &mut PlaybackController<M>,
    ) -> Result<ResolvedSource, PlaybackError> {
        controller.play_file(self.checkpoint.target(), self.checkpoint.time)
    }

    /// Forget the checkpoint
    pub fn decline<M: MediaElement>(
        self,
        controller: &PlaybackController<M>,
    ) -> Result<(), ProgressError> {
        controller.clear_checkpoint()
    }
}

impl<M: MediaElement> PlaybackController<M> {
    /// Prompt for the stored checkpoint, if it is still valid
    pub fn resume_prompt(&self) -> Option<ResumePrompt> {
        let catalog = self.catalog()?;
        ResumePrompt::check(catalog, self.load_checkpoint())
    }
}

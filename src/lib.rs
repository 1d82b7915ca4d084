//! hlsdeck - terminal browser and player for an HLS media library
//!
//! Loads a series → season → episode catalog from a streaming backend,
//! plays episodes through mpv, checkpoints progress and offers to resume.
//!
//! # Modules
//!
//! - `models` - Catalog tree, episode identity, checkpoints
//! - `api` - Backend origin resolution and the catalog client
//! - `stream` - Media elements (mpv, headless)
//! - `playback` - Playback controller, transport, sleep timer, resume prompt
//! - `progress` - Checkpoint persistence
//! - `ui` - TUI components
//! - `app` - Application state and key routing
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod playback;
pub mod progress;
pub mod stream;
pub mod ui;

// Re-export commonly used types
pub use models::{
    Catalog, Episode, EpisodeRef, PlaybackCheckpoint, ResolvedSource, SourceKind,
};

pub use api::{Backend, CatalogClient, CatalogError};
pub use app::{App, CatalogState, Focus};
pub use config::Config;
pub use playback::{PlaybackController, PlaybackError, ResumePrompt};
pub use progress::{ProgressError, ProgressStore};
pub use stream::{HeadlessMedia, MediaElement, MediaEvent, MpvPlayer, PlayerKind};

//! The media element seam
//!
//! Everything the playback controller needs from a video surface. The real
//! implementation talks to mpv; the headless one simulates playback in memory.

use std::time::Duration;
use thiserror::Error;

/// Notifications raised by a media element, drained once per UI tick
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position changed (seconds)
    TimeUpdate(f64),
    /// Duration became known or changed (seconds)
    DurationChanged(f64),
    /// Paused flag flipped
    Paused(bool),
    /// Current source played to its end
    Ended,
}

/// Errors from media element operations
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[source] std::io::Error),
    #[error("Player IPC failed: {0}")]
    Ipc(#[from] std::io::Error),
    #[error("Player IPC is not supported on this platform")]
    Unsupported,
    #[error("Picture-in-picture is not available")]
    PipUnavailable,
    #[error("No source attached")]
    NoSource,
}

/// A controllable video surface
pub trait MediaElement {
    /// Whether HLS manifests can be played (via a library or natively)
    fn supports_adaptive(&self) -> bool;

    /// Attach a source and position it at `start_time` seconds
    fn load(&mut self, url: &str, start_time: f64) -> Result<(), MediaError>;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self) -> Result<(), MediaError>;

    fn is_paused(&self) -> bool;

    /// Elapsed seconds of the current source
    fn current_time(&self) -> f64;

    /// Duration in seconds, `None` while unknown
    fn duration(&self) -> Option<f64>;

    /// Relative seek; the element clamps at its own bounds
    fn seek_by(&mut self, delta: f64) -> Result<(), MediaError>;

    fn has_source(&self) -> bool;

    fn pip_enabled(&self) -> bool;

    fn in_pip(&self) -> bool;

    fn enter_pip(&mut self) -> Result<(), MediaError>;

    fn exit_pip(&mut self) -> Result<(), MediaError>;

    /// Drain events raised since the last call
    fn poll_events(&mut self) -> Vec<MediaEvent>;

    /// Wall-clock time passed since the previous tick
    fn tick(&mut self, _elapsed: Duration) {}

    /// Human name for status lines
    fn name(&self) -> &'static str;
}

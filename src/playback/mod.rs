//! Playback core
//!
//! - controller: source resolution, session, checkpoints
//! - transport: play/pause, seek, stepping, auto-advance, PiP
//! - sleep: single-shot sleep timer
//! - resume: startup resume prompt

pub mod controller;
pub mod resume;
pub mod session;
pub mod sleep;
pub mod transport;

pub use controller::{resolve_source, PlaybackController, PlaybackError, SLEEP_NOTICE};
pub use resume::ResumePrompt;
pub use session::PlaybackSession;
pub use sleep::{SleepTimer, SLEEP_CHOICES};
pub use transport::SEEK_STEP;

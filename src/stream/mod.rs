//! Media elements
//!
//! - media: the `MediaElement` trait and its events
//! - player: mpv driven over JSON IPC
//! - headless: in-memory simulation

pub mod headless;
pub mod media;
pub mod player;

pub use headless::HeadlessMedia;
pub use media::{MediaElement, MediaError, MediaEvent};
pub use player::{MpvPlayer, PlayerKind};

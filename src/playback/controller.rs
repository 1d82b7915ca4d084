//! Playback controller
//!
//! Owns the media element, the session, the sleep timer and the checkpoint
//! store. Every state change goes through its methods; the UI only reads.

use std::time::Instant;
use thiserror::Error;

use crate::api::Backend;
use crate::models::{Catalog, Episode, EpisodeRef, PlaybackCheckpoint, ResolvedSource, SourceKind};
use crate::progress::{ProgressError, ProgressStore};
use crate::stream::{MediaElement, MediaError, MediaEvent};

use super::session::PlaybackSession;
use super::sleep::SleepTimer;

/// Checkpoints are taken when the elapsed whole seconds hit a multiple of this
pub const SAVE_EVERY_SECS: i64 = 5;

/// Shown when the sleep timer pauses playback
pub const SLEEP_NOTICE: &str = "Sleep Timer: Video paused.";

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Catalog not loaded")]
    CatalogUnavailable,
    #[error("No episode at {0}")]
    MissingEpisode(EpisodeRef),
    #[error("Error: No compatible video source found.")]
    NoCompatibleSource,
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Pick the playable URL for an episode
///
/// HLS when a manifest exists and the element can play it, else the direct
/// file, else nothing.
pub fn resolve_source(
    backend: &Backend,
    episode: &Episode,
    adaptive_supported: bool,
) -> Option<ResolvedSource> {
    let adaptive = episode.adaptive_locator().and_then(|l| backend.media_url(l));
    let direct = episode.direct_locator().and_then(|l| backend.media_url(l));

    match (adaptive, direct) {
        (Some(url), _) if adaptive_supported => Some(ResolvedSource {
            kind: SourceKind::Adaptive,
            url,
        }),
        (_, Some(url)) => Some(ResolvedSource {
            kind: SourceKind::Direct,
            url,
        }),
        _ => None,
    }
}

pub struct PlaybackController<M: MediaElement> {
    backend: Backend,
    media: M,
    catalog: Option<Catalog>,
    session: PlaybackSession,
    now_playing: Option<String>,
    source: Option<ResolvedSource>,
    pub(super) sleep: SleepTimer,
    store: ProgressStore,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(backend: Backend, media: M, store: ProgressStore) -> Self {
        Self {
            backend,
            media,
            catalog: None,
            session: PlaybackSession::default(),
            now_playing: None,
            source: None,
            sleep: SleepTimer::new(),
            store,
        }
    }

    /// Install a freshly loaded catalog, replacing any previous one
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn current(&self) -> Option<&EpisodeRef> {
        self.session.current()
    }

    /// "Playing: <name>" once something has started
    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn source(&self) -> Option<&ResolvedSource> {
        self.source.as_ref()
    }

    pub fn sleep_timer(&self) -> &SleepTimer {
        &self.sleep
    }

    /// Start `target` at `start_time` seconds
    ///
    /// On any error the session and the media element are left as they were.
    pub fn play_file(
        &mut self,
        target: EpisodeRef,
        start_time: f64,
    ) -> Result<ResolvedSource, PlaybackError> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(PlaybackError::CatalogUnavailable)?;
        let episode = catalog
            .episode(&target)
            .ok_or_else(|| PlaybackError::MissingEpisode(target.clone()))?;

        let Some(source) = resolve_source(&self.backend, episode, self.media.supports_adaptive())
        else {
            tracing::warn!(episode = %target, "no compatible source");
            return Err(PlaybackError::NoCompatibleSource);
        };
        let name = episode.name.clone();

        self.media.load(&source.url, start_time)?;
        self.media.play()?;

        tracing::info!(episode = %target, kind = %source.kind, url = %source.url, start_time, "playing");
        self.session.set(target);
        self.now_playing = Some(format!("Playing: {}", name));
        self.source = Some(source.clone());
        Ok(source)
    }

    /// React to one media event
    ///
    /// Time updates may checkpoint; `Ended` auto-advances.
    pub fn handle_event(&mut self, event: MediaEvent) -> Result<Option<EpisodeRef>, PlaybackError> {
        match event {
            MediaEvent::TimeUpdate(time) => {
                self.on_time_update(time);
                Ok(None)
            }
            MediaEvent::Ended => self.auto_advance(),
            MediaEvent::DurationChanged(_) | MediaEvent::Paused(_) => Ok(None),
        }
    }

    /// Checkpoint when the whole seconds elapsed are a multiple of five
    fn on_time_update(&mut self, time: f64) {
        let known_duration = self
            .media
            .duration()
            .is_some_and(|d| d.is_finite() && d > 0.0);
        if !known_duration {
            return;
        }
        if (time.floor() as i64) % SAVE_EVERY_SECS == 0 {
            self.save_progress_at(time);
        }
    }

    /// Checkpoint the current position; no-op without a session
    pub fn save_progress(&mut self) -> Option<PlaybackCheckpoint> {
        let time = self.media.current_time();
        self.save_progress_at(time)
    }

    fn save_progress_at(&mut self, time: f64) -> Option<PlaybackCheckpoint> {
        let target = self.session.current()?.clone();
        match self.store.save(&target, time) {
            Ok(checkpoint) => Some(checkpoint),
            Err(e) => {
                tracing::warn!(error = %e, "checkpoint save failed");
                None
            }
        }
    }

    pub fn load_checkpoint(&self) -> Option<PlaybackCheckpoint> {
        self.store.load()
    }

    pub fn clear_checkpoint(&self) -> Result<(), ProgressError> {
        self.store.clear()
    }

    /// Drain pending media events and let the element advance its clock
    pub fn poll_media(&mut self, elapsed: std::time::Duration) -> Vec<MediaEvent> {
        self.media.tick(elapsed);
        self.media.poll_events()
    }

    /// Fire the sleep timer if due; returns the notice to show
    pub fn tick(&mut self, now: Instant) -> Option<&'static str> {
        if !self.sleep.poll(now) {
            return None;
        }
        if let Err(e) = self.media.pause() {
            tracing::warn!(error = %e, "sleep timer pause failed");
        }
        tracing::info!("sleep timer fired");
        Some(SLEEP_NOTICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(hls: Option<&str>, mp4: Option<&str>) -> Episode {
        Episode {
            name: "E".into(),
            hls_url: hls.map(Into::into),
            mp4_url: mp4.map(Into::into),
        }
    }

    #[test]
    fn test_resolve_prefers_adaptive_when_supported() {
        let backend = Backend::resolve(Some("http://h"));
        let ep = episode(Some("a.m3u8"), Some("a.mp4"));

        let src = resolve_source(&backend, &ep, true).unwrap();
        assert_eq!(src.kind, SourceKind::Adaptive);
        assert_eq!(src.url, "http://h/hls/a.m3u8");

        let src = resolve_source(&backend, &ep, false).unwrap();
        assert_eq!(src.kind, SourceKind::Direct);
        assert_eq!(src.url, "http://h/hls/a.mp4");
    }

    #[test]
    fn test_resolve_without_locators() {
        let backend = Backend::default();
        assert!(resolve_source(&backend, &episode(None, None), true).is_none());
        assert!(resolve_source(&backend, &episode(Some("a.m3u8"), None), false).is_none());
        assert!(resolve_source(&backend, &episode(Some(""), Some("")), true).is_none());
    }
}

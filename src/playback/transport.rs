//! Transport controls
//!
//! Play/pause, relative seek, episode stepping, auto-advance, sleep timer and
//! picture-in-picture, layered on `PlaybackController`.

use std::time::Instant;

use crate::models::EpisodeRef;
use crate::stream::MediaElement;

use super::controller::{PlaybackController, PlaybackError};

/// Seconds moved by one seek step
pub const SEEK_STEP: f64 = 10.0;

impl<M: MediaElement> PlaybackController<M> {
    /// Play when paused, pause when playing; nothing to do without a source
    pub fn toggle_play(&mut self) -> Result<(), PlaybackError> {
        if !self.media().has_source() {
            return Ok(());
        }
        if self.media().is_paused() {
            self.media_mut().play()?;
        } else {
            self.media_mut().pause()?;
        }
        Ok(())
    }

    pub fn seek_back(&mut self) -> Result<(), PlaybackError> {
        self.media_mut().seek_by(-SEEK_STEP)?;
        Ok(())
    }

    pub fn seek_forward(&mut self) -> Result<(), PlaybackError> {
        self.media_mut().seek_by(SEEK_STEP)?;
        Ok(())
    }

    pub fn previous(&mut self) -> Result<Option<EpisodeRef>, PlaybackError> {
        self.step_episode(-1)
    }

    pub fn next(&mut self) -> Result<Option<EpisodeRef>, PlaybackError> {
        self.step_episode(1)
    }

    /// Move within the current season; past either edge nothing happens
    fn step_episode(&mut self, offset: isize) -> Result<Option<EpisodeRef>, PlaybackError> {
        let target = match (self.catalog(), self.current()) {
            (Some(catalog), Some(current)) => catalog.offset(current, offset),
            _ => None,
        };
        self.play_target(target)
    }

    /// Continue after the current episode ended
    ///
    /// Next episode of the season, else first episode of the next season,
    /// else stop.
    pub fn auto_advance(&mut self) -> Result<Option<EpisodeRef>, PlaybackError> {
        let target = match (self.catalog(), self.current()) {
            (Some(catalog), Some(current)) => catalog.next_after(current),
            _ => None,
        };
        if target.is_none() && self.current().is_some() {
            tracing::info!("end of series reached, playback stops");
        }
        self.play_target(target)
    }

    fn play_target(
        &mut self,
        target: Option<EpisodeRef>,
    ) -> Result<Option<EpisodeRef>, PlaybackError> {
        match target {
            Some(target) => {
                self.play_file(target.clone(), 0.0)?;
                Ok(Some(target))
            }
            None => Ok(None),
        }
    }

    /// Replace any pending sleep action with one `minutes` from `now`
    pub fn set_sleep_timer(&mut self, minutes: u32, now: Instant) {
        self.sleep.select(minutes, now);
    }

    /// Advance the sleep selector to its next value
    pub fn cycle_sleep_timer(&mut self, now: Instant) -> u32 {
        self.sleep.cycle(now)
    }

    /// Enter or leave picture-in-picture; failures are only logged
    pub fn toggle_pip(&mut self) {
        let media = self.media_mut();
        let result = if media.in_pip() {
            media.exit_pip()
        } else if media.pip_enabled() && media.has_source() {
            media.enter_pip()
        } else {
            Ok(())
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "PiP error");
        }
    }
}

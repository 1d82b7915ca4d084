//! In-memory media element
//!
//! Simulates a video surface without decoding anything: time advances only
//! when told to, and reaching the duration raises `Ended`. Drives the
//! `--player headless` mode and the test suite.

use std::collections::VecDeque;
use std::time::Duration;

use super::media::{MediaElement, MediaError, MediaEvent};

/// Duration given to every loaded source unless overridden
pub const DEFAULT_DURATION: f64 = 1800.0;

#[derive(Debug, Clone)]
pub struct HeadlessMedia {
    adaptive: bool,
    pip_enabled: bool,
    pip_fails: bool,
    source_duration: f64,
    source: Option<String>,
    time: f64,
    duration: Option<f64>,
    paused: bool,
    pip: bool,
    loads: Vec<(String, f64)>,
    events: VecDeque<MediaEvent>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self {
            adaptive: true,
            pip_enabled: true,
            pip_fails: false,
            source_duration: DEFAULT_DURATION,
            source: None,
            time: 0.0,
            duration: None,
            paused: true,
            pip: false,
            loads: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Element without HLS support
    pub fn without_adaptive(mut self) -> Self {
        self.adaptive = false;
        self
    }

    pub fn with_pip_enabled(mut self, enabled: bool) -> Self {
        self.pip_enabled = enabled;
        self
    }

    /// Make every PiP request fail as if the capability were denied
    pub fn with_failing_pip(mut self) -> Self {
        self.pip_fails = true;
        self
    }

    pub fn with_source_duration(mut self, seconds: f64) -> Self {
        self.source_duration = seconds;
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Every `load` call so far as (url, start_time)
    pub fn loads(&self) -> &[(String, f64)] {
        &self.loads
    }

    /// Play forward by `seconds` in one-second steps, raising a time update
    /// per step and `Ended` when the duration is reached
    pub fn advance(&mut self, seconds: f64) {
        if self.paused || self.source.is_none() {
            return;
        }
        let end = self.duration.unwrap_or(f64::INFINITY);
        let target = (self.time + seconds).min(end);
        while self.time < target {
            self.time = (self.time + 1.0).min(target);
            self.events.push_back(MediaEvent::TimeUpdate(self.time));
        }
        if self.time >= end {
            self.paused = true;
            self.events.push_back(MediaEvent::Ended);
        }
    }

    /// Jump to the end of the current source
    pub fn finish(&mut self) {
        if let Some(duration) = self.duration {
            self.time = duration;
            self.paused = true;
            self.events.push_back(MediaEvent::TimeUpdate(duration));
            self.events.push_back(MediaEvent::Ended);
        }
    }
}

impl Default for HeadlessMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for HeadlessMedia {
    fn supports_adaptive(&self) -> bool {
        self.adaptive
    }

    fn load(&mut self, url: &str, start_time: f64) -> Result<(), MediaError> {
        self.source = Some(url.to_string());
        self.loads.push((url.to_string(), start_time));
        self.duration = Some(self.source_duration);
        self.time = start_time.clamp(0.0, self.source_duration);
        self.paused = true;
        self.events
            .push_back(MediaEvent::DurationChanged(self.source_duration));
        self.events.push_back(MediaEvent::TimeUpdate(self.time));
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Err(MediaError::NoSource);
        }
        if self.paused {
            self.paused = false;
            self.events.push_back(MediaEvent::Paused(false));
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        if !self.paused {
            self.paused = true;
            self.events.push_back(MediaEvent::Paused(true));
        }
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn seek_by(&mut self, delta: f64) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Ok(());
        }
        let end = self.duration.unwrap_or(f64::INFINITY);
        self.time = (self.time + delta).clamp(0.0, end);
        self.events.push_back(MediaEvent::TimeUpdate(self.time));
        Ok(())
    }

    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn pip_enabled(&self) -> bool {
        self.pip_enabled
    }

    fn in_pip(&self) -> bool {
        self.pip
    }

    fn enter_pip(&mut self) -> Result<(), MediaError> {
        if self.pip_fails || !self.pip_enabled {
            return Err(MediaError::PipUnavailable);
        }
        if self.source.is_none() {
            return Err(MediaError::NoSource);
        }
        self.pip = true;
        Ok(())
    }

    fn exit_pip(&mut self) -> Result<(), MediaError> {
        if self.pip_fails {
            return Err(MediaError::PipUnavailable);
        }
        self.pip = false;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.events.drain(..).collect()
    }

    fn tick(&mut self, elapsed: Duration) {
        self.advance(elapsed.as_secs_f64());
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}

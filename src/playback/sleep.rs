//! Sleep timer
//!
//! A single deferred pause. Selecting a value always cancels whatever was
//! pending before scheduling anew, so at most one action is ever pending.

use std::time::{Duration, Instant};

/// Selectable minute offsets; 0 is "off"
pub const SLEEP_CHOICES: [u32; 6] = [0, 15, 30, 45, 60, 90];

#[derive(Debug, Clone, Default)]
pub struct SleepTimer {
    minutes: u32,
    deadline: Option<Instant>,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected value (0 = off)
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Cancel any pending pause, then schedule `minutes` from `now`
    pub fn select(&mut self, minutes: u32, now: Instant) {
        self.deadline = None;
        self.minutes = minutes;
        if minutes > 0 {
            self.deadline = Some(now + Duration::from_secs(u64::from(minutes) * 60));
            tracing::info!(minutes, "sleep timer set");
        } else {
            tracing::info!("sleep timer off");
        }
    }

    /// Step to the next choice in `SLEEP_CHOICES`, wrapping to off
    pub fn cycle(&mut self, now: Instant) -> u32 {
        let pos = SLEEP_CHOICES
            .iter()
            .position(|&m| m == self.minutes)
            .unwrap_or(0);
        let next = SLEEP_CHOICES[(pos + 1) % SLEEP_CHOICES.len()];
        self.select(next, now);
        next
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once when the deadline passes; the selector
    /// drops back to off
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.minutes = 0;
                true
            }
            _ => false,
        }
    }
}

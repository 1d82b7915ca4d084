//! What is playing right now

use crate::models::EpisodeRef;

/// In-memory record of the current episode; empty until the first play
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSession {
    current: Option<EpisodeRef>,
}

impl PlaybackSession {
    pub fn current(&self) -> Option<&EpisodeRef> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn set(&mut self, target: EpisodeRef) {
        self.current = Some(target);
    }
}

//! Data structures for hlsdeck
//!
//! Shared models used across the application, organized by domain:
//! - **Catalog**: series → season → episode tree loaded from the backend
//! - **Playback**: the episode triple, resolved sources, checkpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

// =============================================================================
// Catalog Models
// =============================================================================

/// One playable entry in a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Display name
    pub name: String,
    /// Adaptive (HLS manifest) locator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hls_url: Option<String>,
    /// Direct (progressive download) locator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp4_url: Option<String>,
}

impl Episode {
    pub fn adaptive_locator(&self) -> Option<&str> {
        self.hls_url.as_deref().filter(|s| !s.is_empty())
    }

    pub fn direct_locator(&self) -> Option<&str> {
        self.mp4_url.as_deref().filter(|s| !s.is_empty())
    }
}

/// Seasons of one series, keyed by season name
pub type Seasons = BTreeMap<String, Vec<Episode>>;

/// The full series → season → episode library
///
/// Keys iterate in lexicographic order, which is the display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    series: BTreeMap<String, Seasons>,
}

impl Catalog {
    pub fn new(series: BTreeMap<String, Seasons>) -> Self {
        Self { series }
    }

    /// Parse a catalog document
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series names in display order
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn seasons(&self, series: &str) -> Option<&Seasons> {
        self.series.get(series)
    }

    /// Season names of a series in display order
    pub fn season_names(&self, series: &str) -> Vec<&str> {
        self.series
            .get(series)
            .map(|s| s.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn episodes(&self, series: &str, season: &str) -> Option<&[Episode]> {
        self.series
            .get(series)
            .and_then(|s| s.get(season))
            .map(Vec::as_slice)
    }

    pub fn episode(&self, target: &EpisodeRef) -> Option<&Episode> {
        self.episodes(&target.series, &target.season)
            .and_then(|eps| eps.get(target.index))
    }

    /// True when series, season and index all exist
    pub fn contains(&self, target: &EpisodeRef) -> bool {
        self.episode(target).is_some()
    }

    /// Neighbour within the same season, `None` past either edge
    pub fn offset(&self, target: &EpisodeRef, offset: isize) -> Option<EpisodeRef> {
        let eps = self.episodes(&target.series, &target.season)?;
        let index = target.index.checked_add_signed(offset)?;
        (index < eps.len()).then(|| EpisodeRef {
            index,
            ..target.clone()
        })
    }

    /// Where playback continues once `target` finishes
    ///
    /// Next episode in the season, else the first episode of the next season
    /// of the same series. Never crosses into another series.
    pub fn next_after(&self, target: &EpisodeRef) -> Option<EpisodeRef> {
        if let Some(next) = self.offset(target, 1) {
            return Some(next);
        }

        let seasons = self.series.get(&target.series)?;
        if !seasons.contains_key(&target.season) {
            return None;
        }

        let (next_season, episodes) = seasons
            .range::<str, _>((Bound::Excluded(target.season.as_str()), Bound::Unbounded))
            .next()?;

        // An empty next season ends playback
        (!episodes.is_empty()).then(|| EpisodeRef::new(&target.series, next_season, 0))
    }

    /// Total number of episodes across the catalog
    pub fn episode_count(&self) -> usize {
        self.series
            .values()
            .flat_map(|s| s.values())
            .map(Vec::len)
            .sum()
    }
}

/// Human form of a catalog key (`Breaking_Bad` → `Breaking Bad`)
pub fn display_key(key: &str) -> String {
    key.replace('_', " ")
}

// =============================================================================
// Playback Models
// =============================================================================

/// Identity of an episode: (series, season, index)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub series: String,
    pub season: String,
    pub index: usize,
}

impl EpisodeRef {
    pub fn new(series: impl Into<String>, season: impl Into<String>, index: usize) -> Self {
        Self {
            series: series.into(),
            season: season.into(),
            index,
        }
    }
}

impl fmt::Display for EpisodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / #{}", self.series, self.season, self.index)
    }
}

/// Which locator of an episode was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// HLS manifest
    Adaptive,
    /// Single progressive file
    Direct,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Adaptive => write!(f, "HLS"),
            SourceKind::Direct => write!(f, "MP4"),
        }
    }
}

/// A playable URL and how it was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    pub url: String,
}

/// The single persisted resume point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackCheckpoint {
    pub series: String,
    pub season: String,
    pub index: usize,
    /// Elapsed seconds
    pub time: f64,
    /// Capture time, Unix milliseconds
    pub timestamp: u64,
}

impl PlaybackCheckpoint {
    pub fn target(&self) -> EpisodeRef {
        EpisodeRef::new(&self.series, &self.season, self.index)
    }
}

/// Format seconds as `m:ss` (minutes unbounded, seconds zero-padded)
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

//! App state and core application logic
//!
//! Holds the library tree state, the playback controller, popups and the
//! resume modal, and routes key and media events between them.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::CatalogError;
use crate::models::{Catalog, EpisodeRef};
use crate::playback::{PlaybackController, PlaybackError, ResumePrompt};
use crate::stream::{MediaElement, MediaEvent};

// =============================================================================
// Catalog State
// =============================================================================

/// Lifecycle of the one catalog fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CatalogState {
    /// Fetch in flight
    #[default]
    Loading,
    /// Catalog installed
    Ready,
    /// Fetch failed; playback stays unavailable for the session
    Failed(String),
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CatalogState::Failed(_))
    }
}

// =============================================================================
// Focus
// =============================================================================

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Library,
    Player,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Library State
// =============================================================================

/// One visible line of the library tree
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryRow {
    Series(String),
    Season { series: String, season: String },
    Episode { target: EpisodeRef, name: String },
}

/// Series headers, season toggles and the episodes of the one open season
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    open: Option<(String, String)>,
    rows: Vec<LibraryRow>,
    pub list: ListState,
}

impl LibraryState {
    /// Rebuild the visible rows from `catalog`
    pub fn rebuild(&mut self, catalog: &Catalog) {
        let mut rows = Vec::new();
        for series in catalog.series_names() {
            rows.push(LibraryRow::Series(series.to_string()));
            for season in catalog.season_names(series) {
                rows.push(LibraryRow::Season {
                    series: series.to_string(),
                    season: season.to_string(),
                });
                if !self.is_open(series, season) {
                    continue;
                }
                let episodes = catalog.episodes(series, season).unwrap_or_default();
                for (index, ep) in episodes.iter().enumerate() {
                    rows.push(LibraryRow::Episode {
                        target: EpisodeRef::new(series, season, index),
                        name: ep.name.clone(),
                    });
                }
            }
        }
        self.list.set_len(rows.len());
        self.rows = rows;
    }

    pub fn rows(&self) -> &[LibraryRow] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&LibraryRow> {
        self.rows.get(self.list.selected)
    }

    pub fn open_season(&self) -> Option<(&str, &str)> {
        self.open.as_ref().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn is_open(&self, series: &str, season: &str) -> bool {
        self.open_season() == Some((series, season))
    }

    /// Open `season`, closing any other; toggling the open one closes it
    pub fn toggle_season(&mut self, catalog: &Catalog, series: &str, season: &str) {
        if self.is_open(series, season) {
            self.open = None;
        } else {
            self.open = Some((series.to_string(), season.to_string()));
        }
        self.rebuild(catalog);

        // Keep the cursor on the toggled season row
        if let Some(pos) = self.rows.iter().position(|row| {
            matches!(row, LibraryRow::Season { series: s, season: n } if s == series && n == season)
        }) {
            self.list.selected = pos;
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App<M: MediaElement> {
    /// Whether the app is running
    pub running: bool,
    /// Pane receiving navigation keys
    pub focus: Focus,
    /// Catalog fetch lifecycle
    pub catalog_state: CatalogState,
    /// Library tree
    pub library: LibraryState,
    /// Playback core
    pub player: PlaybackController<M>,
    /// Pending resume modal
    pub resume: Option<ResumePrompt>,
    /// Blocking error popup
    pub error: Option<String>,
    /// Blocking informational popup
    pub notice: Option<String>,
}

impl<M: MediaElement> App<M> {
    pub fn new(player: PlaybackController<M>) -> Self {
        Self {
            running: true,
            focus: Focus::Library,
            catalog_state: CatalogState::Loading,
            library: LibraryState::default(),
            player,
            resume: None,
            error: None,
            notice: None,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Install the result of the startup fetch, then check for a resume point
    pub fn on_catalog_loaded(&mut self, result: Result<Catalog, CatalogError>) {
        match result {
            Ok(catalog) => {
                self.library.rebuild(&catalog);
                self.player.set_catalog(catalog);
                self.catalog_state = CatalogState::Ready;
                self.resume = self.player.resume_prompt();
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog load failed");
                self.catalog_state = CatalogState::Failed(e.to_string());
            }
        }
    }

    /// Play `target` and bring the player into focus; failures become popups
    pub fn play(&mut self, target: EpisodeRef, start_time: f64) {
        match self.player.play_file(target, start_time) {
            Ok(_) => self.focus = Focus::Player,
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: PlaybackError) {
        tracing::warn!(error = %error, "playback request failed");
        self.set_error(error.to_string());
    }

    /// Route drained media events through the controller
    pub fn on_media_events(&mut self, events: Vec<MediaEvent>) {
        for event in events {
            match self.player.handle_event(event) {
                Ok(Some(_)) => self.focus = Focus::Player,
                Ok(None) => {}
                Err(e) => self.report(e),
            }
        }
    }

    /// Periodic work: sleep timer
    pub fn tick(&mut self, now: Instant) {
        if let Some(notice) = self.player.tick(now) {
            self.notice = Some(notice.to_string());
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        // Popups swallow the key that dismisses them
        if self.error.is_some() || self.notice.is_some() {
            self.error = None;
            self.notice = None;
            return true;
        }

        if self.resume.is_some() {
            return self.handle_resume_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Library => Focus::Player,
                    Focus::Player => Focus::Library,
                };
                return true;
            }
            _ => {}
        }

        if self.handle_transport_key(key) {
            return true;
        }

        match self.focus {
            Focus::Library => self.handle_library_key(key),
            Focus::Player => false,
        }
    }

    fn handle_resume_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(prompt) = self.resume.take() {
                    match prompt.accept(&mut self.player) {
                        Ok(_) => self.focus = Focus::Player,
                        Err(e) => self.report(e),
                    }
                }
                true
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                if let Some(prompt) = self.resume.take() {
                    if let Err(e) = prompt.decline(&self.player) {
                        tracing::warn!(error = %e, "could not clear checkpoint");
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Keys that act on playback regardless of focus
    fn handle_transport_key(&mut self, key: KeyEvent) -> bool {
        let result = match key.code {
            KeyCode::Char(' ') => self.player.toggle_play(),
            KeyCode::Left => self.player.seek_back(),
            KeyCode::Right => self.player.seek_forward(),
            KeyCode::Char('p') | KeyCode::PageUp => self.player.previous().map(|_| ()),
            KeyCode::Char('n') | KeyCode::PageDown => self.player.next().map(|_| ()),
            KeyCode::Char('t') => {
                self.player.cycle_sleep_timer(Instant::now());
                Ok(())
            }
            KeyCode::Char('P') => {
                self.player.toggle_pip();
                Ok(())
            }
            _ => return false,
        };
        if let Err(e) = result {
            self.report(e);
        }
        true
    }

    fn handle_library_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.library.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.library.list.down();
                true
            }
            KeyCode::Home => {
                self.library.list.first();
                true
            }
            KeyCode::End => {
                self.library.list.last();
                true
            }
            KeyCode::Enter => {
                self.activate_selected();
                true
            }
            _ => false,
        }
    }

    /// Enter on a library row: toggle a season or play an episode
    fn activate_selected(&mut self) {
        match self.library.selected_row().cloned() {
            Some(LibraryRow::Season { series, season }) => {
                if let Some(catalog) = self.player.catalog() {
                    self.library.toggle_season(catalog, &series, &season);
                }
            }
            Some(LibraryRow::Episode { target, .. }) => self.play(target, 0.0),
            Some(LibraryRow::Series(_)) | None => {}
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

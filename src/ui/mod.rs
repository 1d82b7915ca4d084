//! Terminal UI components
//!
//! Built with ratatui. Library tree on the left, now-playing pane on the
//! right, popups drawn over both.

pub mod library;
pub mod player;
pub mod popup;
pub mod theme;

pub use library::LibraryView;
pub use theme::Theme;

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Paragraph},
};

use crate::app::{App, CatalogState, Focus};
use crate::stream::MediaElement;

/// Draw one frame of the whole interface
pub fn render<M: MediaElement>(frame: &mut Frame, app: &App<M>) {
    render_at(frame, app, Instant::now());
}

/// Like [`render`] with an explicit clock for the sleep countdown
pub fn render_at<M: MediaElement>(frame: &mut Frame, app: &App<M>, now: Instant) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    LibraryView {
        state: &app.catalog_state,
        rows: app.library.rows(),
        list: &app.library.list,
        open: app.library.open_season(),
        active: app.player.current(),
        focused: app.focus == Focus::Library,
    }
    .render(frame, panes[0]);

    player::render(frame, panes[1], &app.player, app.focus == Focus::Player, now);

    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        popup::render_error(frame, area, error);
    } else if let Some(ref notice) = app.notice {
        popup::render_notice(frame, area, notice);
    } else if let Some(ref prompt) = app.resume {
        popup::render_resume(frame, area, prompt);
    }
}

fn render_header<M: MediaElement>(frame: &mut Frame, area: Rect, app: &App<M>) {
    let line = Line::from(vec![
        Span::styled(" ◉ HLSDECK ", Theme::title()),
        Span::styled(app.player.backend().origin().to_string(), Theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar<M: MediaElement>(frame: &mut Frame, area: Rect, app: &App<M>) {
    let focus = match app.focus {
        Focus::Library => Span::styled(
            " LIBRARY ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        Focus::Player => Span::styled(
            " PLAYER ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::SUCCESS),
        ),
    };

    let catalog = match &app.catalog_state {
        CatalogState::Loading => Span::styled(" loading ", Theme::loading()),
        CatalogState::Ready => {
            let count = app.player.catalog().map_or(0, |c| c.episode_count());
            Span::styled(format!(" {} episodes ", count), Theme::dimmed())
        }
        CatalogState::Failed(_) => Span::styled(" offline ", Theme::error()),
    };

    let help = Span::styled(
        " q:quit  tab:focus  enter:open/play  space:pause  t:sleep ",
        Theme::dimmed(),
    );

    let status = Paragraph::new(Line::from(vec![focus, catalog, Span::raw("│"), help]))
        .style(Theme::status_bar());
    frame.render_widget(status, area);
}

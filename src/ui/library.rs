//! Library tree view
//!
//! Series headers, season toggles and the episodes of the open season. The
//! entry the playback session points at carries the active marker.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{CatalogState, LibraryRow, ListState};
use crate::models::{display_key, EpisodeRef};
use crate::ui::Theme;

/// Shown in place of the tree when the catalog fetch failed
pub const BACKEND_DOWN: &str = "Cannot connect to backend";

/// Borrowed view over the library state for one frame
pub struct LibraryView<'a> {
    pub state: &'a CatalogState,
    pub rows: &'a [LibraryRow],
    pub list: &'a ListState,
    pub open: Option<(&'a str, &'a str)>,
    pub active: Option<&'a EpisodeRef>,
    pub focused: bool,
}

impl LibraryView<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border(self.focused))
            .title(Span::styled(" LIBRARY ", Theme::title()));

        match self.state {
            CatalogState::Loading => {
                let para = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("Loading library...", Theme::loading())),
                ])
                .alignment(Alignment::Center)
                .block(block);
                frame.render_widget(para, area);
            }
            CatalogState::Failed(reason) => {
                let para = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(BACKEND_DOWN, Theme::error())),
                    Line::from(""),
                    Line::from(Span::styled(reason.clone(), Theme::dimmed())),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block.border_style(Theme::error()));
                frame.render_widget(para, area);
            }
            CatalogState::Ready if self.rows.is_empty() => {
                let para = Paragraph::new("Library is empty")
                    .style(Theme::dimmed())
                    .alignment(Alignment::Center)
                    .block(block);
                frame.render_widget(para, area);
            }
            CatalogState::Ready => self.render_tree(frame, area, block),
        }
    }

    fn render_tree(&self, frame: &mut Frame, area: Rect, block: Block) {
        let visible_height = area.height.saturating_sub(2) as usize;
        let mut list = self.list.clone();
        list.scroll_into_view(visible_height);

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .skip(list.offset)
            .take(visible_height)
            .map(|(i, row)| self.render_row(row, i == list.selected))
            .collect();

        frame.render_widget(List::new(items).block(block).style(Theme::text()), area);
    }

    fn render_row(&self, row: &LibraryRow, selected: bool) -> ListItem<'static> {
        let (text, style) = match row {
            LibraryRow::Series(name) => (display_key(name).to_uppercase(), Theme::series_header()),
            LibraryRow::Season { series, season } => {
                let open = self.open == Some((series.as_str(), season.as_str()));
                let arrow = if open { "▾" } else { "▸" };
                (format!("  {} {}", arrow, display_key(season)), Theme::season(open))
            }
            LibraryRow::Episode { target, name } => {
                let active = self.active == Some(target);
                let marker = if active { "▶" } else { " " };
                (format!("    {} {}", marker, name), Theme::episode(active))
            }
        };

        let style = if selected && self.focused {
            Theme::cursor()
        } else {
            style
        };
        ListItem::new(Line::from(Span::styled(text, style)))
    }
}

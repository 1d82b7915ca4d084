//! Blocking overlays: error and notice popups, the resume modal

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::playback::ResumePrompt;
use crate::ui::Theme;

/// Rect of `width` x `height` centered in `area`, clipped to it
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn boxed(frame: &mut Frame, area: Rect, title: &str, style: Style, lines: Vec<Line>) {
    let popup = centered(area, 60, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(style)
                .title(Span::styled(format!(" {} ", title), style))
                .style(Style::default().bg(Theme::BACKGROUND)),
        );
    frame.render_widget(para, popup);
}

pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    boxed(
        frame,
        area,
        "✗ ERROR",
        Theme::error(),
        vec![
            Line::from(""),
            Line::from(Span::styled(error.to_string(), Theme::error())),
            Line::from(Span::styled("press any key", Theme::dimmed())),
        ],
    );
}

pub fn render_notice(frame: &mut Frame, area: Rect, notice: &str) {
    boxed(
        frame,
        area,
        "NOTICE",
        Theme::sleep_timer(),
        vec![
            Line::from(""),
            Line::from(Span::styled(notice.to_string(), Theme::text())),
            Line::from(Span::styled("press any key", Theme::dimmed())),
        ],
    );
}

pub fn render_resume(frame: &mut Frame, area: Rect, prompt: &ResumePrompt) {
    boxed(
        frame,
        area,
        "RESUME",
        Theme::title(),
        vec![
            Line::from(""),
            Line::from(Span::styled(prompt.message(), Theme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", Theme::keybind()),
                Span::styled("Resume   ", Theme::dimmed()),
                Span::styled(" n ", Theme::keybind()),
                Span::styled("Start over", Theme::dimmed()),
            ]),
        ],
    );
}

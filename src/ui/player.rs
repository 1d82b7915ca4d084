//! Now Playing pane
//!
//! Title, progress bar, sleep countdown and transport hints.

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::models::format_time;
use crate::playback::PlaybackController;
use crate::stream::MediaElement;
use crate::ui::Theme;

const BAR_WIDTH: usize = 40;

/// Fraction of `duration` elapsed, 0.0 when unknown
pub fn progress_ratio(time: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 => (time / d).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Render the player pane for `player`
pub fn render<M: MediaElement>(
    frame: &mut Frame,
    area: Rect,
    player: &PlaybackController<M>,
    focused: bool,
    now: Instant,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border(focused))
        .title(Span::styled(" ▶ NOW PLAYING ", Theme::success()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(title) = player.now_playing() else {
        let idle = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Nothing playing", Theme::dimmed())),
            Line::from(""),
            Line::from(Span::styled("Pick an episode and press Enter", Theme::dimmed())),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(idle, inner);
        return;
    };

    let media = player.media();
    let time = media.current_time();
    let duration = media.duration();
    let filled = (progress_ratio(time, duration) * BAR_WIDTH as f64) as usize;

    let state = if media.is_paused() { "❚❚ Paused" } else { "▶ Playing" };
    let clock = match duration {
        Some(d) if d.is_finite() && d > 0.0 => format!("{} / {}", format_time(time), format_time(d)),
        _ => format_time(time),
    };

    let mut badges = Vec::new();
    if let Some(source) = player.source() {
        badges.push(Span::styled(format!("[{}] ", source.kind), Theme::keybind()));
    }
    if media.in_pip() {
        badges.push(Span::styled("[PiP] ", Theme::keybind()));
    }
    badges.push(Span::styled(media.name(), Theme::dimmed()));

    let timer = player.sleep_timer();
    let sleep_line = match timer.remaining(now) {
        Some(left) => Line::from(Span::styled(
            format!("Sleep in {} ({} min)", format_time(left.as_secs_f64()), timer.minutes()),
            Theme::sleep_timer(),
        )),
        None => Line::from(Span::styled("Sleep timer off", Theme::dimmed())),
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), Theme::title())),
        Line::from(badges),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled)),
            Theme::progress_bar(),
        )),
        Line::from(Span::styled(format!("{}  {}", state, clock), Theme::dimmed())),
        Line::from(""),
        sleep_line,
        Line::from(""),
        Line::from(vec![
            Span::styled(" SPACE ", Theme::keybind()),
            Span::styled("Play/Pause  ", Theme::dimmed()),
            Span::styled(" ←→ ", Theme::keybind()),
            Span::styled("Seek 10s  ", Theme::dimmed()),
            Span::styled(" p/n ", Theme::keybind()),
            Span::styled("Prev/Next  ", Theme::dimmed()),
            Span::styled(" t ", Theme::keybind()),
            Span::styled("Sleep  ", Theme::dimmed()),
            Span::styled(" P ", Theme::keybind()),
            Span::styled("PiP", Theme::dimmed()),
        ]),
    ];

    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress_ratio(30.0, Some(120.0)), 0.25);
        assert_eq!(progress_ratio(30.0, None), 0.0);
        assert_eq!(progress_ratio(30.0, Some(f64::INFINITY)), 0.0);
        assert_eq!(progress_ratio(500.0, Some(120.0)), 1.0);
    }
}

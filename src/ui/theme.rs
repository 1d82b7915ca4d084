//! Night-shelf theme for hlsdeck
//!
//! Color palette and style helpers for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0b0d12
    pub const BACKGROUND: Color = Color::Rgb(0x0b, 0x0d, 0x12);

    /// Primary: #4fd1c5 (teal)
    pub const PRIMARY: Color = Color::Rgb(0x4f, 0xd1, 0xc5);

    /// Secondary: #b794f4 (lavender)
    pub const SECONDARY: Color = Color::Rgb(0xb7, 0x94, 0xf4);

    /// Accent: #f6e05e (amber)
    pub const ACCENT: Color = Color::Rgb(0xf6, 0xe0, 0x5e);

    /// Text: #e2e8f0
    pub const TEXT: Color = Color::Rgb(0xe2, 0xe8, 0xf0);

    /// Dim: #5a6478
    pub const DIM: Color = Color::Rgb(0x5a, 0x64, 0x78);

    /// Success: #68d391
    pub const SUCCESS: Color = Color::Rgb(0x68, 0xd3, 0x91);

    /// Warning: #f6ad55
    pub const WARNING: Color = Color::Rgb(0xf6, 0xad, 0x55);

    /// Error: #fc8181
    pub const ERROR: Color = Color::Rgb(0xfc, 0x81, 0x81);

    /// Panels and the status bar
    pub const PANEL: Color = Color::Rgb(0x16, 0x1a, 0x23);

    /// Unfocused border
    pub const BORDER: Color = Color::Rgb(0x2c, 0x6e, 0x69);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Self::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::BORDER)
        }
    }

    pub fn progress_bar() -> Style {
        Style::default().fg(Self::SUCCESS).bg(Self::PANEL)
    }

    // Library

    pub fn series_header() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn season(open: bool) -> Style {
        if open {
            Style::default()
                .fg(Self::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::TEXT)
        }
    }

    /// Episode entry; the playing one is marked
    pub fn episode(active: bool) -> Style {
        if active {
            Style::default()
                .fg(Self::SUCCESS)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::TEXT)
        }
    }

    /// Cursor row
    pub fn cursor() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // Chrome

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn sleep_timer() -> Style {
        Style::default().fg(Self::WARNING)
    }
}

/// Relative luminance per WCAG 2.0
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between two colors, 1.0 to 21.0; non-RGB colors give `None`
pub fn contrast_ratio(fg: Color, bg: Color) -> Option<f64> {
    let (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) = (fg, bg) else {
        return None;
    };
    let l1 = relative_luminance(r1, g1, b1);
    let l2 = relative_luminance(r2, g2, b2);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    Some((lighter + 0.05) / (darker + 0.05))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_on_background() {
        // 4.5:1 for body text, 3:1 for bold accents
        for (name, color, min) in [
            ("TEXT", Theme::TEXT, 4.5),
            ("PRIMARY", Theme::PRIMARY, 3.0),
            ("SECONDARY", Theme::SECONDARY, 3.0),
            ("SUCCESS", Theme::SUCCESS, 3.0),
            ("ERROR", Theme::ERROR, 3.0),
            ("WARNING", Theme::WARNING, 3.0),
        ] {
            let ratio = contrast_ratio(color, Theme::BACKGROUND).unwrap();
            assert!(ratio >= min, "{} contrast {:.2} < {}", name, ratio, min);
        }
    }

    #[test]
    fn test_cursor_inverts_readably() {
        let ratio = contrast_ratio(Theme::BACKGROUND, Theme::PRIMARY).unwrap();
        assert!(ratio >= 3.0);
    }

    #[test]
    fn test_active_episode_stands_out() {
        assert_ne!(Theme::episode(true).fg, Theme::episode(false).fg);
        assert_ne!(Theme::season(true).fg, Theme::season(false).fg);
    }

    #[test]
    fn test_contrast_extremes() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert!((contrast_ratio(black, white).unwrap() - 21.0).abs() < 0.1);
        assert!((contrast_ratio(white, white).unwrap() - 1.0).abs() < 0.001);
        assert!(contrast_ratio(Color::Red, white).is_none());
    }
}

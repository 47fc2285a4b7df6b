//! TUI color theme
//!
//! One palette, defined in one place so the render functions never
//! hard-code colors.

use ratatui::style::{Color, Modifier, Style};

/// Theme colors and style helpers
pub struct Theme;

impl Theme {
    // Core palette
    pub const BACKGROUND: Color = Color::Rgb(16, 18, 26);
    pub const PRIMARY: Color = Color::Rgb(255, 82, 82);
    pub const SECONDARY: Color = Color::Rgb(130, 170, 255);
    pub const ACCENT: Color = Color::Rgb(255, 203, 107);
    pub const TEXT: Color = Color::Rgb(214, 222, 235);
    pub const DIM: Color = Color::Rgb(96, 103, 119);
    pub const BORDER: Color = Color::Rgb(63, 68, 81);
    pub const ERROR: Color = Color::Rgb(255, 85, 85);
    pub const SUCCESS: Color = Color::Rgb(80, 250, 123);

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn highlighted() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn channel() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn loading() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::SLOW_BLINK)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::BACKGROUND).bg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::DIM).bg(Self::BACKGROUND)
    }
}

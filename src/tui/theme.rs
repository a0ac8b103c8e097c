//! Theme system for the TUI
//!
//! Provides color schemes and styling for all UI components.

use ratatui::style::{Color, Modifier, Style};

pub use crate::ui_backend::ThemePreset;

/// Theme colors for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg_main: Color,
    pub bg_dark: Color,
    pub bg_sidebar: Color,
    pub bg_selected: Color,

    // Border colors
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accent colors
    pub cyan: Color,
    pub blue: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub purple: Color,

    /// Foreground drawn on top of coloured badges
    pub badge_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default)
    pub fn catppuccin_mocha() -> Self {
        Self {
            bg_main: Color::Rgb(30, 30, 46),
            bg_dark: Color::Rgb(24, 24, 37),
            bg_sidebar: Color::Rgb(30, 30, 46),
            bg_selected: Color::Rgb(49, 50, 68),

            border: Color::Rgb(49, 50, 68),
            border_focused: Color::Rgb(137, 180, 250),

            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            text_muted: Color::Rgb(108, 112, 134),

            cyan: Color::Rgb(148, 226, 213),
            blue: Color::Rgb(137, 180, 250),
            green: Color::Rgb(166, 227, 161),
            yellow: Color::Rgb(249, 226, 175),
            red: Color::Rgb(243, 139, 168),
            purple: Color::Rgb(203, 166, 247),

            badge_fg: Color::Rgb(17, 17, 27),
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            bg_main: Color::Rgb(46, 52, 64), // nord0
            bg_dark: Color::Rgb(40, 44, 52), // darker variant
            bg_sidebar: Color::Rgb(46, 52, 64),
            bg_selected: Color::Rgb(59, 66, 82), // nord1

            border: Color::Rgb(76, 86, 106),           // nord3
            border_focused: Color::Rgb(136, 192, 208), // nord8

            text_primary: Color::Rgb(236, 239, 244), // nord6
            text_secondary: Color::Rgb(229, 233, 240), // nord5
            text_muted: Color::Rgb(143, 157, 179),   // nord4

            cyan: Color::Rgb(136, 192, 208),   // nord8
            blue: Color::Rgb(129, 161, 193),   // nord9
            green: Color::Rgb(163, 190, 140),  // nord14
            yellow: Color::Rgb(235, 203, 139), // nord13
            red: Color::Rgb(191, 97, 106),     // nord11
            purple: Color::Rgb(180, 142, 173), // nord15

            badge_fg: Color::Rgb(46, 52, 64),
        }
    }

    /// Light theme for bright terminals
    pub fn light() -> Self {
        Self {
            bg_main: Color::Rgb(250, 250, 250),
            bg_dark: Color::Rgb(235, 236, 240),
            bg_sidebar: Color::Rgb(244, 245, 247),
            bg_selected: Color::Rgb(220, 224, 232),

            border: Color::Rgb(200, 203, 210),
            border_focused: Color::Rgb(0, 119, 204),

            text_primary: Color::Rgb(52, 55, 65),
            text_secondary: Color::Rgb(89, 94, 107),
            text_muted: Color::Rgb(135, 140, 150),

            cyan: Color::Rgb(0, 130, 140),
            blue: Color::Rgb(0, 119, 204),
            green: Color::Rgb(1, 125, 115),
            yellow: Color::Rgb(180, 120, 0),
            red: Color::Rgb(189, 39, 30),
            purple: Color::Rgb(145, 80, 190),

            badge_fg: Color::Rgb(255, 255, 255),
        }
    }

    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::CatppuccinMocha => Self::catppuccin_mocha(),
            ThemePreset::Nord => Self::nord(),
            ThemePreset::Light => Self::light(),
        }
    }

    /// Filled badge with the given background
    pub fn badge(&self, bg: Color) -> Style {
        Style::default()
            .fg(self.badge_fg)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }
}

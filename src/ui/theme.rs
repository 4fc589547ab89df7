//! Theme definitions for confdeck
//!
//! Provides three built-in themes: Gruvbox, Nord, and Transparent.
//! Each theme defines colors for all UI elements.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Complete theme with all required colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // Accent colors
    pub accent: Color,
    pub accent_dim: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Special indicators
    pub active_marker: Color,
    pub bar_fill: Color,
}

impl Theme {
    /// Create a theme from a theme name
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Gruvbox => Self::gruvbox(),
            ThemeName::Nord => Self::nord(),
            ThemeName::Transparent => Self::transparent(),
        }
    }

    /// Gruvbox dark theme (default)
    pub fn gruvbox() -> Self {
        Self {
            // Base
            bg: Color::Rgb(40, 40, 40),           // #282828
            fg: Color::Rgb(235, 219, 178),        // #ebdbb2
            fg_dim: Color::Rgb(146, 131, 116),    // #928374

            // Accent (orange)
            accent: Color::Rgb(254, 128, 25),     // #fe8019
            accent_dim: Color::Rgb(214, 93, 14),  // #d65d0e

            // Status
            success: Color::Rgb(184, 187, 38),    // #b8bb26
            warning: Color::Rgb(250, 189, 47),    // #fabd2f
            error: Color::Rgb(251, 73, 52),       // #fb4934

            // UI elements
            border: Color::Rgb(80, 73, 69),       // #504945
            border_focused: Color::Rgb(168, 153, 132), // #a89984
            selection_bg: Color::Rgb(80, 73, 69), // #504945
            selection_fg: Color::Rgb(235, 219, 178), // #ebdbb2

            // Markers
            active_marker: Color::Rgb(184, 187, 38),  // green
            bar_fill: Color::Rgb(131, 165, 152),      // #83a598 (blue)
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            // Base (Polar Night)
            bg: Color::Rgb(46, 52, 64),           // #2e3440
            fg: Color::Rgb(236, 239, 244),        // #eceff4
            fg_dim: Color::Rgb(76, 86, 106),      // #4c566a

            // Accent (Frost - blue)
            accent: Color::Rgb(136, 192, 208),    // #88c0d0
            accent_dim: Color::Rgb(94, 129, 172), // #5e81ac

            // Status (Aurora)
            success: Color::Rgb(163, 190, 140),   // #a3be8c (green)
            warning: Color::Rgb(235, 203, 139),   // #ebcb8b (yellow)
            error: Color::Rgb(191, 97, 106),      // #bf616a (red)

            // UI elements
            border: Color::Rgb(59, 66, 82),       // #3b4252
            border_focused: Color::Rgb(136, 192, 208), // #88c0d0
            selection_bg: Color::Rgb(76, 86, 106),    // #4c566a
            selection_fg: Color::Rgb(236, 239, 244),  // #eceff4

            // Markers
            active_marker: Color::Rgb(163, 190, 140),
            bar_fill: Color::Rgb(129, 161, 193),
        }
    }

    /// Transparent theme (uses terminal colors)
    pub fn transparent() -> Self {
        Self {
            // Base - use terminal defaults
            bg: Color::Reset,
            fg: Color::Reset,
            fg_dim: Color::DarkGray,

            // Accent
            accent: Color::Cyan,
            accent_dim: Color::Blue,

            // Status
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,

            // UI elements
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,

            // Markers
            active_marker: Color::Green,
            bar_fill: Color::Blue,
        }
    }

    // Style helpers for common UI patterns

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Dimmed text style
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected item style
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style (unfocused)
    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    /// Border style (focused)
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused).bg(self.bg)
    }

    /// Navigation item style (inactive)
    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Navigation item style (active)
    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Success message style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    /// Warning message style
    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning).bg(self.bg)
    }

    /// Error message style
    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    /// Active profile marker
    pub fn marker_active(&self) -> Style {
        Style::default()
            .fg(self.active_marker)
            .add_modifier(Modifier::BOLD)
    }

    /// Usage bar style
    pub fn bar(&self) -> Style {
        Style::default().fg(self.bar_fill).bg(self.bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        let gruvbox = Theme::from_name(ThemeName::Gruvbox);
        assert_eq!(gruvbox.bg, Color::Rgb(40, 40, 40));

        let nord = Theme::from_name(ThemeName::Nord);
        assert_eq!(nord.bg, Color::Rgb(46, 52, 64));

        let transparent = Theme::from_name(ThemeName::Transparent);
        assert_eq!(transparent.bg, Color::Reset);
    }
}

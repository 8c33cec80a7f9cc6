//! TUI Theme configuration
//!
//! Centralized theme system for consistent styling across the UI.
//! Supports multiple color depths for terminal compatibility.

use ratatui::style::{Color, Style};

use crate::git::{FileStatus, RefKind};
use crate::graph::PALETTE_SIZE;

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Basic 16 ANSI colors (maximum compatibility)
    Basic,
    /// 256 color palette
    #[default]
    Indexed,
    /// True color (24-bit RGB)
    TrueColor,
}

impl ColorMode {
    /// Detect the best color mode for the current terminal
    pub fn detect() -> Self {
        // Check COLORTERM first (most reliable for true color)
        if let Ok(colorterm) = std::env::var("COLORTERM") {
            if colorterm == "truecolor" || colorterm == "24bit" {
                return Self::TrueColor;
            }
        }

        if let Ok(term) = std::env::var("TERM") {
            if term.contains("kitty") || term.contains("alacritty") {
                return Self::TrueColor;
            }
            if term.contains("256color") {
                return Self::Indexed;
            }
        }

        Self::Basic
    }
}

/// Theme configuration for the TUI
#[derive(Clone)]
pub struct Theme {
    /// Graph lane colors, indexed by palette index
    pub lanes: [Color; PALETTE_SIZE],

    // Pane borders
    pub border_focused: Color,
    pub border_unfocused: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_accent: Color,

    // Ref badges
    pub ref_head: Color,
    pub ref_branch: Color,
    pub ref_remote: Color,
    pub ref_tag: Color,

    // File status
    pub status_untracked: Color,
    pub status_added: Color,
    pub status_renamed: Color,
    pub status_modified: Color,
    pub status_deleted: Color,
    pub status_conflict: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_color_mode(ColorMode::detect())
    }
}

impl Theme {
    /// Create a theme for the specified color mode
    pub fn for_color_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Basic => Self::basic(),
            ColorMode::Indexed => Self::indexed(),
            ColorMode::TrueColor => Self::truecolor(),
        }
    }

    /// Basic 16-color theme (maximum compatibility)
    pub fn basic() -> Self {
        Self {
            lanes: [
                Color::Green,
                Color::Blue,
                Color::Magenta,
                Color::Yellow,
                Color::LightMagenta,
                Color::Cyan,
                Color::LightRed,
                Color::LightBlue,
                Color::LightGreen,
                Color::Red,
            ],

            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,

            text_primary: Color::Reset,
            text_secondary: Color::DarkGray,
            text_accent: Color::Blue,

            ref_head: Color::Red,
            ref_branch: Color::Green,
            ref_remote: Color::Yellow,
            ref_tag: Color::Magenta,

            status_untracked: Color::DarkGray,
            status_added: Color::Green,
            status_renamed: Color::Blue,
            status_modified: Color::Yellow,
            status_deleted: Color::Red,
            status_conflict: Color::LightRed,

            status_bar_bg: Color::Blue,
            status_bar_fg: Color::White,
        }
    }

    /// 256-color theme (good balance of compatibility and aesthetics)
    pub fn indexed() -> Self {
        Self {
            lanes: [
                Color::Indexed(114), // green
                Color::Indexed(75),  // blue
                Color::Indexed(177), // purple
                Color::Indexed(221), // yellow
                Color::Indexed(211), // pink
                Color::Indexed(80),  // cyan
                Color::Indexed(215), // orange
                Color::Indexed(141), // violet
                Color::Indexed(79),  // emerald
                Color::Indexed(210), // red
            ],

            border_focused: Color::Indexed(117),
            border_unfocused: Color::Indexed(243),

            text_primary: Color::Reset,
            text_secondary: Color::Indexed(250),
            text_accent: Color::Indexed(147),

            ref_head: Color::Indexed(203),
            ref_branch: Color::Indexed(156),
            ref_remote: Color::Indexed(222),
            ref_tag: Color::Indexed(183),

            status_untracked: Color::Indexed(245),
            status_added: Color::Indexed(156),
            status_renamed: Color::Indexed(117),
            status_modified: Color::Indexed(222),
            status_deleted: Color::Indexed(210),
            status_conflict: Color::Indexed(203),

            status_bar_bg: Color::Indexed(236),
            status_bar_fg: Color::Indexed(252),
        }
    }

    /// True color theme (richest visual experience)
    pub fn truecolor() -> Self {
        Self {
            lanes: [
                Color::Rgb(74, 222, 128),  // green
                Color::Rgb(96, 165, 250),  // blue
                Color::Rgb(192, 132, 252), // purple
                Color::Rgb(250, 204, 21),  // yellow
                Color::Rgb(244, 114, 182), // pink
                Color::Rgb(34, 211, 238),  // cyan
                Color::Rgb(251, 146, 60),  // orange
                Color::Rgb(167, 139, 250), // violet
                Color::Rgb(52, 211, 153),  // emerald
                Color::Rgb(248, 113, 113), // red
            ],

            border_focused: Color::Rgb(137, 180, 250),
            border_unfocused: Color::Rgb(88, 91, 112),

            text_primary: Color::Rgb(245, 245, 250),
            text_secondary: Color::Rgb(166, 173, 200),
            text_accent: Color::Rgb(180, 190, 254),

            ref_head: Color::Rgb(248, 113, 113),
            ref_branch: Color::Rgb(166, 227, 161),
            ref_remote: Color::Rgb(249, 226, 175),
            ref_tag: Color::Rgb(203, 166, 247),

            status_untracked: Color::Rgb(147, 153, 178),
            status_added: Color::Rgb(166, 227, 161),
            status_renamed: Color::Rgb(137, 180, 250),
            status_modified: Color::Rgb(249, 226, 175),
            status_deleted: Color::Rgb(243, 139, 168),
            status_conflict: Color::Rgb(248, 113, 113),

            status_bar_bg: Color::Rgb(49, 50, 68),
            status_bar_fg: Color::Rgb(205, 214, 244),
        }
    }

    /// Color for a graph palette index
    pub fn lane(&self, color: usize) -> Color {
        self.lanes[color % PALETTE_SIZE]
    }

    pub fn file_status(&self, status: FileStatus) -> Color {
        match status {
            FileStatus::Untracked => self.status_untracked,
            FileStatus::Added => self.status_added,
            FileStatus::Renamed => self.status_renamed,
            FileStatus::Modified => self.status_modified,
            FileStatus::Deleted => self.status_deleted,
            FileStatus::Conflict => self.status_conflict,
        }
    }

    pub fn ref_kind(&self, kind: RefKind) -> Color {
        match kind {
            RefKind::Head => self.ref_head,
            RefKind::LocalBranch => self.ref_branch,
            RefKind::RemoteBranch => self.ref_remote,
            RefKind::Tag => self.ref_tag,
        }
    }

    /// Border style depending on focus
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border_unfocused)
        }
    }

    /// Style for status bar
    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bar_bg).fg(self.status_bar_fg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_theme() {
        let theme = Theme::basic();
        assert_eq!(theme.border_focused, Color::Cyan);
        assert_eq!(theme.lane(0), Color::Green);
    }

    #[test]
    fn test_lane_colors_wrap() {
        let theme = Theme::indexed();
        assert_eq!(theme.lane(PALETTE_SIZE + 1), theme.lane(1));
    }

    #[test]
    fn test_palette_is_distinct() {
        for theme in [Theme::basic(), Theme::indexed(), Theme::truecolor()] {
            for (i, a) in theme.lanes.iter().enumerate() {
                for b in &theme.lanes[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_status_colors() {
        let theme = Theme::basic();
        assert_eq!(theme.file_status(FileStatus::Conflict), Color::LightRed);
        assert_eq!(theme.file_status(FileStatus::Modified), Color::Yellow);
        assert_eq!(theme.ref_kind(RefKind::Head), Color::Red);
    }

    #[test]
    fn test_color_mode_for_theme() {
        let basic = Theme::for_color_mode(ColorMode::Basic);
        let indexed = Theme::for_color_mode(ColorMode::Indexed);
        let truecolor = Theme::for_color_mode(ColorMode::TrueColor);

        assert_eq!(basic.border_focused, Color::Cyan);
        assert_eq!(indexed.border_focused, Color::Indexed(117));
        assert_eq!(truecolor.border_focused, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_border_style() {
        let theme = Theme::basic();
        assert_eq!(theme.border(true).fg, Some(Color::Cyan));
        assert_eq!(theme.border(false).fg, Some(Color::DarkGray));
    }
}

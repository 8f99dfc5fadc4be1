//! Neon theme for streamagg
//!
//! Color palette and style helpers for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Palette and named styles shared by every screen region
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    pub const BACKGROUND: Color = Color::Rgb(0x0a, 0x0a, 0x0f);
    /// Cyan: titles, focus, the search cursor
    pub const PRIMARY: Color = Color::Rgb(0x00, 0xff, 0xf2);
    /// Magenta: years and MOVIE badges
    pub const SECONDARY: Color = Color::Rgb(0xff, 0x00, 0xff);
    /// Yellow: key hints, TV badges, CC marker
    pub const ACCENT: Color = Color::Rgb(0xff, 0xff, 0x00);
    /// Hot pink: the active source button
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0x00, 0x80);
    pub const TEXT: Color = Color::Rgb(0xe0, 0xe0, 0xe0);
    pub const DIM: Color = Color::Rgb(0x40, 0x40, 0x50);
    pub const SUCCESS: Color = Color::Rgb(0x00, 0xff, 0x00);
    pub const WARNING: Color = Color::Rgb(0xff, 0xaa, 0x00);
    pub const ERROR: Color = Color::Rgb(0xff, 0x00, 0x40);

    /// Search box and status bar fill
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x14, 0x14, 0x1e);
    pub const BORDER: Color = Color::Rgb(0x00, 0x80, 0x78);
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Inverted cyan for the cursor card or row
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Source button under the cursor
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Region titles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Border of the focused region
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Loading popup and feed spinner text
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BADGES
    // ═══════════════════════════════════════════════════════════════════════

    /// MOVIE badge
    pub fn badge_movie() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// TV badge
    pub fn badge_tv() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Source quality badge
    pub fn quality_badge() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Subtitle availability marker
    pub fn subtitle_marker() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Rating: green at 7+, orange at 5+, dim below
    pub fn rating(label: &str) -> Style {
        match label.parse::<f32>() {
            Ok(r) if r >= 7.0 => Style::default().fg(Self::SUCCESS),
            Ok(r) if r >= 5.0 => Style::default().fg(Self::WARNING),
            _ => Self::dimmed(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Cursor row in the season and episode lists
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Block cursor drawn over the char at the edit position
    pub fn input_cursor() -> Style {
        Style::default().fg(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    /// Key names in the status bar hints
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Active source button
    pub fn source_active() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Active genre tab
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Poster/stream URL text
    pub fn url() -> Style {
        Style::default()
            .fg(Self::DIM)
            .add_modifier(Modifier::ITALIC)
    }
}

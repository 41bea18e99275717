//! Colour palette shared by every pane

use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    /// Headings and the phase badge
    pub primary: Color,
    /// Input mode and auto-play
    pub secondary: Color,
    /// Placeholders, indices and separators
    pub comment: Color,
    pub success: Color,
    /// Failures and conflicting table cells
    pub error: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    /// Background of the status bar and of highlighted rows
    pub current_line_bg: Color,
    pub terminal: Color,
    pub nonterminal: Color,
    pub state: Color,
    /// Edge labels and queue movement markers
    pub highlight: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    terminal: Color::Rgb(250, 179, 135),
    nonterminal: Color::Rgb(148, 226, 213),
    state: Color::Rgb(137, 180, 250),
    highlight: Color::Rgb(245, 194, 231),
};

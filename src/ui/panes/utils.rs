//! Helpers shared by every pane

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, ListItem},
};

/// Bordered block whose border reflects focus
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` to the content and return the items that fit.
///
/// `usize::MAX` as an offset means "stick to the bottom".
pub(crate) fn visible_window<'a>(
    all_items: Vec<ListItem<'a>>,
    area: Rect,
    scroll_offset: &mut usize,
) -> Vec<ListItem<'a>> {
    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect()
}

/// Style for a symbol name by kind
pub(crate) fn symbol_style(terminal: Option<bool>) -> Style {
    match terminal {
        Some(true) => Style::default().fg(DEFAULT_THEME.terminal),
        Some(false) => Style::default().fg(DEFAULT_THEME.nonterminal),
        None => Style::default().fg(DEFAULT_THEME.comment),
    }
}

/// Pad or cut `text` to exactly `width` characters
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("s4", 5), "s4   ");
        assert_eq!(fit("s4, r2", 4), "s4, ");
        assert_eq!(fit("ε", 2), "ε ");
    }

    #[test]
    fn test_visible_window_sticks_to_bottom() {
        let items: Vec<ListItem> = (0..10).map(|i| ListItem::new(i.to_string())).collect();
        let mut scroll = usize::MAX;
        let shown = visible_window(items, Rect::new(0, 0, 10, 6), &mut scroll);
        assert_eq!(shown.len(), 4);
        assert_eq!(scroll, 6);
    }
}

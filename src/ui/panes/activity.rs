//! Activity log pane rendering

use super::utils::{pane_block, visible_window};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};
use std::collections::VecDeque;

/// Render the activity log; section headers stand out
pub fn render_activity_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &VecDeque<String>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Activity ", is_focused);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(nothing yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let all_items: Vec<ListItem> = lines
        .iter()
        .map(|line| {
            let color = if line.starts_with("==") {
                DEFAULT_THEME.primary
            } else if line.starts_with('+') || line.starts_with('~') {
                DEFAULT_THEME.comment
            } else {
                DEFAULT_THEME.fg
            };
            ListItem::new(line.as_str()).style(Style::default().fg(color))
        })
        .collect();

    let visible = visible_window(all_items, area, scroll_offset);
    let list = List::new(visible).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}

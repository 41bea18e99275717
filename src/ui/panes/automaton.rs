//! Automaton states and transitions

use super::utils::{pane_block, visible_window};
use crate::model::ParsingEnv;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render each state with its item description and outgoing edges.
///
/// `highlight` is the state index touched most recently.
pub fn render_automaton_pane(
    frame: &mut Frame,
    area: Rect,
    env: Option<&ParsingEnv>,
    highlight: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Automaton ", is_focused);

    let Some(env) = env.filter(|e| e.automaton.state_count() > 0) else {
        let paragraph = Paragraph::new("(no states)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut items = Vec::new();
    for (index, state) in env.automaton.states() {
        let mut title_style = Style::default()
            .fg(DEFAULT_THEME.state)
            .add_modifier(Modifier::BOLD);
        if highlight == Some(index) {
            title_style = title_style.bg(DEFAULT_THEME.current_line_bg);
        }

        let mut spans = vec![Span::styled(format!("I{}", index), title_style)];
        if state.is_start {
            spans.push(Span::styled(
                " start",
                Style::default().fg(DEFAULT_THEME.success),
            ));
        }
        if state.is_final {
            spans.push(Span::styled(
                " final",
                Style::default().fg(DEFAULT_THEME.secondary),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));

        for line in state.description.lines() {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("    {}", line),
                Style::default().fg(DEFAULT_THEME.fg),
            ))));
        }
        for edge in env.automaton.edges.iter().filter(|e| e.from == index) {
            items.push(ListItem::new(Line::from(vec![
                Span::styled("    --", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    edge.label.clone(),
                    Style::default().fg(DEFAULT_THEME.highlight),
                ),
                Span::styled("--> ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    format!("I{}", edge.to),
                    Style::default().fg(DEFAULT_THEME.state),
                ),
            ])));
        }
    }

    let visible = visible_window(items, area, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}

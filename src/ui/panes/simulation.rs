//! Shift-reduce simulation: stacks, remaining input and the parse tree

use super::utils::{pane_block, visible_window};
use crate::model::{ParsingEnv, QueueKind};
use crate::replay::QueueOp;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the three queues (bottom/front first) and the parse tree outline.
///
/// `last_queue` marks the queue that moved on the latest step and
/// `last_node` the tree node most recently added or attached.
#[allow(clippy::too_many_arguments)]
pub fn render_simulation_pane(
    frame: &mut Frame,
    area: Rect,
    env: Option<&ParsingEnv>,
    last_queue: Option<(QueueKind, QueueOp)>,
    last_node: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Simulation ", is_focused);

    let Some(env) = env else {
        let paragraph = Paragraph::new("(no environment)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut items = Vec::new();
    for kind in [
        QueueKind::StateStack,
        QueueKind::SymbolStack,
        QueueKind::InputQueue,
    ] {
        let moved = last_queue.filter(|(queue, _)| *queue == kind);
        let mut label_style = Style::default().fg(DEFAULT_THEME.primary);
        if moved.is_some() {
            label_style = label_style.add_modifier(Modifier::BOLD);
        }
        let value_style = if kind.holds_symbols() {
            Style::default().fg(DEFAULT_THEME.terminal)
        } else {
            Style::default().fg(DEFAULT_THEME.state)
        };

        let mut spans = vec![Span::styled(format!("{:<13}", kind.to_string()), label_style)];
        spans.push(Span::styled(env.render_queue(kind).join(" "), value_style));
        if let Some((_, op)) = moved {
            let arrow = if op.is_push() { "  +" } else { "  -" };
            spans.push(Span::styled(
                arrow,
                Style::default().fg(DEFAULT_THEME.highlight),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    let tree = env.forest.outline_indexed();
    if !tree.is_empty() {
        items.push(ListItem::new(""));
        items.push(ListItem::new(Line::from(Span::styled(
            "Parse tree",
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ))));
        for (node, line) in tree {
            let mut style = Style::default().fg(DEFAULT_THEME.nonterminal);
            if last_node == Some(node) {
                style = style.bg(DEFAULT_THEME.current_line_bg);
            }
            items.push(ListItem::new(line).style(style));
        }
    }

    let visible = visible_window(items, area, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}

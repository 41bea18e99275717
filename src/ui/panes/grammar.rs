//! Symbol table and production list

use super::utils::{pane_block, symbol_style, visible_window};
use crate::model::{symbol, ParsingEnv};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

/// Render symbols (kind, nullable, FIRST, FOLLOW) followed by productions
pub fn render_grammar_pane(
    frame: &mut Frame,
    area: Rect,
    env: Option<&ParsingEnv>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Grammar ", is_focused);

    let Some(env) = env else {
        let paragraph = Paragraph::new("(no environment)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let dim = Style::default().fg(DEFAULT_THEME.comment);
    let header = Style::default()
        .fg(DEFAULT_THEME.primary)
        .add_modifier(Modifier::BOLD);
    let mut items = vec![ListItem::new(Line::from(Span::styled("Symbols", header)))];

    for (i, sym) in env.symbols.iter().enumerate() {
        let mut spans = vec![
            Span::styled(format!("{:>3} ", i), dim),
            Span::styled(
                symbol::symbol_name(&env.symbols, i),
                symbol_style(sym.terminal),
            ),
        ];
        if sym.start == Some(true) {
            spans.push(Span::styled(" (start)", dim));
        }
        if sym.is_nonterminal() {
            spans.push(Span::styled(
                format!("  nullable: {}", flag(sym.nullable)),
                dim,
            ));
        }
        if !sym.first.is_empty() {
            spans.push(Span::raw(format!(
                "  FIRST {{{}}}",
                symbol::render_set(&sym.first, &env.symbols)
            )));
        }
        if !sym.follow.is_empty() {
            spans.push(Span::raw(format!(
                "  FOLLOW {{{}}}",
                symbol::render_set(&sym.follow, &env.symbols)
            )));
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(Span::styled("Productions", header))));
    for (i, production) in env.productions.iter().enumerate() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("{:>3} ", i), dim),
            Span::styled(
                production.render(&env.symbols),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ])));
    }

    let visible = visible_window(items, area, scroll_offset);
    let list = List::new(visible).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}

//! Parse table grid with conflicts highlighted

use super::utils::{fit, pane_block, symbol_style, visible_window};
use crate::model::{symbol, table, ParsingEnv};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

const STATE_WIDTH: usize = 5;
const CELL_WIDTH: usize = 8;

pub fn render_table_pane(
    frame: &mut Frame,
    area: Rect,
    env: Option<&ParsingEnv>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let conflicts = env.map(|e| table::conflicts(&e.table)).unwrap_or_default();
    let title = if conflicts.is_empty() {
        " Parse Table ".to_string()
    } else {
        format!(" Parse Table ({} conflicts) ", conflicts.len())
    };
    let block = pane_block(&title, is_focused);

    let Some(env) = env.filter(|e| !e.table.is_empty()) else {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    // Columns: every symbol seen in the grammar or in a row
    let columns = env
        .table
        .iter()
        .map(|row| row.len())
        .max()
        .unwrap_or(0)
        .max(env.symbols.len());

    let dim = Style::default().fg(DEFAULT_THEME.comment);
    let mut header = vec![Span::styled(fit("", STATE_WIDTH), dim)];
    for col in 0..columns {
        let terminal = env.symbols.peek(col).and_then(|s| s.terminal);
        header.push(Span::styled(
            fit(&symbol::symbol_name(&env.symbols, col), CELL_WIDTH),
            symbol_style(terminal).add_modifier(Modifier::BOLD),
        ));
    }
    let mut items = vec![ListItem::new(Line::from(header))];

    for (state, row) in env.table.iter().enumerate() {
        let mut spans = vec![Span::styled(
            fit(&state.to_string(), STATE_WIDTH),
            Style::default().fg(DEFAULT_THEME.state),
        )];
        for col in 0..columns {
            let (text, style) = match row.peek(col) {
                Some(cell) if cell.has_conflict() => (
                    cell.to_string(),
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Some(cell) if !cell.is_empty() => {
                    (cell.to_string(), Style::default().fg(DEFAULT_THEME.fg))
                }
                _ => ("·".to_string(), dim),
            };
            spans.push(Span::styled(fit(&text, CELL_WIDTH), style));
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    // Explain every conflict below the grid
    for (state, col) in conflicts {
        let Some(cell) = env.table.peek(state).and_then(|row| row.peek(col)) else {
            continue;
        };
        items.push(ListItem::new(""));
        items.push(ListItem::new(Line::from(Span::styled(
            format!(
                "state {} on {}:",
                state,
                symbol::symbol_name(&env.symbols, col)
            ),
            Style::default().fg(DEFAULT_THEME.error),
        ))));
        for line in cell.explain(&env.symbols, &env.productions) {
            items.push(ListItem::new(format!("  {}", line)));
        }
    }

    let visible = visible_window(items, area, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}

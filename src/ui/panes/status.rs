//! Status bar rendering with keybindings and state indicators

use crate::session::{Phase, PhaseState};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows, gathered by the app each frame
pub struct StatusRenderData<'a> {
    pub phase: Phase,
    pub state: PhaseState,
    pub cursor: usize,
    pub total: usize,
    pub message: &'a str,
    pub is_error: bool,
    pub is_playing: bool,
    /// `Some` while the user is typing an input sentence
    pub input: Option<&'a str>,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let bar = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let badge_bg = if data.is_error {
        DEFAULT_THEME.error
    } else if data.input.is_some() {
        DEFAULT_THEME.secondary
    } else {
        DEFAULT_THEME.primary
    };

    let mut left_spans = vec![
        Span::styled(
            format!(" {} ", data.phase),
            Style::default()
                .bg(badge_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}/{} ", data.cursor.min(data.total), data.total),
            bar.fg(DEFAULT_THEME.comment),
        ),
        Span::styled("| ", bar.fg(DEFAULT_THEME.comment)),
    ];
    match data.input {
        Some(text) => {
            left_spans.push(Span::styled("input: ", bar.fg(DEFAULT_THEME.secondary)));
            left_spans.push(Span::styled(format!("{}_", text), bar.fg(DEFAULT_THEME.fg)));
        }
        None => left_spans.push(Span::styled(
            data.message.to_string(),
            bar.fg(if data.is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        )),
    }

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar.fg(DEFAULT_THEME.fg);
    let sep_style = bar.fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    let keys: &[(&str, &str)] = if data.input.is_some() {
        &[(" ↵ ", " run "), (" esc ", " cancel ")]
    } else {
        &[
            (" → ", " step "),
            (" ↵ ", " finish "),
            (" ⎵ ", " play "),
            (" n ", " next "),
            (" r ", " input "),
            (" q ", " quit "),
        ]
    };
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*desc, desc_style));
    }

    let indicator = if data.input.is_some() {
        Some((" ⌨ INPUT ", DEFAULT_THEME.secondary))
    } else if data.is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if data.state == PhaseState::PhaseComplete {
        Some((" DONE ", DEFAULT_THEME.success))
    } else if data.state == PhaseState::Idle {
        Some((" IDLE ", DEFAULT_THEME.error))
    } else {
        None
    };
    if let Some((label, color)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar)
            .alignment(Alignment::Right),
        layout[1],
    );
}

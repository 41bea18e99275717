//! Main TUI application state and logic

use super::visualizer::TuiVisualizer;
use crate::session::{Phase, PhaseState, SessionController, SessionError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Grammar,
    Table,
    Automaton,
    Simulation,
    Log,
}

impl FocusedPane {
    /// Move focus to the next pane (grammar -> table -> automaton -> simulation -> log)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Grammar => FocusedPane::Table,
            FocusedPane::Table => FocusedPane::Automaton,
            FocusedPane::Automaton => FocusedPane::Simulation,
            FocusedPane::Simulation => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Grammar,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Grammar => FocusedPane::Log,
            FocusedPane::Table => FocusedPane::Grammar,
            FocusedPane::Automaton => FocusedPane::Table,
            FocusedPane::Simulation => FocusedPane::Automaton,
            FocusedPane::Log => FocusedPane::Simulation,
        }
    }
}

/// The main application state
pub struct App {
    /// Controller of the phase on screen
    pub controller: SessionController,

    pub visualizer: TuiVisualizer,

    /// Input sentence handed to the test phase when it is reached
    pub pending_input: Option<String>,

    /// Text typed so far while entering a new input sentence
    pub input_buffer: Option<String>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub grammar_scroll: usize,
    pub table_scroll: usize,
    pub automaton_scroll: usize,
    pub simulation_scroll: usize,
    pub log_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether the status message reports a failure
    pub is_error: bool,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create an app around an already started controller
    pub fn new(
        controller: SessionController,
        visualizer: TuiVisualizer,
        pending_input: Option<String>,
    ) -> Self {
        App {
            controller,
            visualizer,
            pending_input,
            input_buffer: None,
            focused_pane: FocusedPane::Grammar,
            grammar_scroll: 0,
            table_scroll: 0,
            automaton_scroll: 0,
            simulation_scroll: 0,
            log_scroll: usize::MAX,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_error: false,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                self.step();
                if self.controller.state() != PhaseState::Running {
                    self.is_playing = false;
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Grammar | Parse table
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[0]);

        // Right column: Automaton | Simulation | Activity
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(30),
                Constraint::Percentage(25),
            ])
            .split(columns[1]);

        let env = self.controller.env();

        super::panes::render_grammar_pane(
            frame,
            left_rows[0],
            env,
            self.focused_pane == FocusedPane::Grammar,
            &mut self.grammar_scroll,
        );

        super::panes::render_table_pane(
            frame,
            left_rows[1],
            env,
            self.focused_pane == FocusedPane::Table,
            &mut self.table_scroll,
        );

        super::panes::render_automaton_pane(
            frame,
            right_rows[0],
            env,
            self.visualizer.last_state,
            self.focused_pane == FocusedPane::Automaton,
            &mut self.automaton_scroll,
        );

        super::panes::render_simulation_pane(
            frame,
            right_rows[1],
            env,
            self.visualizer.last_queue,
            self.visualizer.last_node,
            self.focused_pane == FocusedPane::Simulation,
            &mut self.simulation_scroll,
        );

        super::panes::render_activity_pane(
            frame,
            right_rows[2],
            self.visualizer.log(),
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        let status = super::panes::StatusRenderData {
            phase: self.controller.phase(),
            state: self.controller.state(),
            cursor: self.controller.cursor(),
            total: self.controller.script().map_or(0, |s| s.len()),
            message: &self.status_message,
            is_error: self.is_error,
            is_playing: self.is_playing,
            input: self.input_buffer.as_deref(),
        };
        super::panes::render_status_bar(frame, main_chunks[1], &status);
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.input_buffer.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Right | KeyCode::Char('c') => {
                self.is_playing = false;
                self.step();
            }
            KeyCode::Enter | KeyCode::Char('f') => {
                self.is_playing = false;
                self.finish();
            }
            KeyCode::Char('n') => {
                self.is_playing = false;
                self.next_phase();
            }
            KeyCode::Char('r') => {
                self.is_playing = false;
                if self.controller.phase().supports_reset() {
                    self.input_buffer = Some(String::new());
                } else {
                    self.report_ok("Input can only be changed in the Test phase");
                }
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                if *scroll == usize::MAX {
                    // Sticky bottom; the pane clamps it on the next draw
                    *scroll = 0;
                } else {
                    *scroll = scroll.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.report_ok("Playing...");
                    } else {
                        self.report_ok("Paused");
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.input_buffer.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.input_buffer = None;
                self.report_ok("Input cancelled");
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Enter => {
                let input = self.input_buffer.take().unwrap_or_default();
                self.reset(&input);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Grammar => &mut self.grammar_scroll,
            FocusedPane::Table => &mut self.table_scroll,
            FocusedPane::Automaton => &mut self.automaton_scroll,
            FocusedPane::Simulation => &mut self.simulation_scroll,
            FocusedPane::Log => &mut self.log_scroll,
        }
    }

    fn step(&mut self) {
        let result = self.controller.step(&mut self.visualizer);
        self.report(result, "Stepped");
    }

    fn finish(&mut self) {
        let result = self.controller.finish(&mut self.visualizer);
        self.report(result, "Finished");
    }

    /// Hand the finished environment to the next phase and replay its entry
    fn next_phase(&mut self) {
        let script = self.controller.script().cloned();
        let result = self.controller.next_phase().and_then(|mut next| {
            if let Some(script) = script {
                next.load_script(script, &mut self.visualizer)?;
            }
            Ok(next)
        });
        match result {
            Ok(next) => {
                let message = format!("Entered {} phase", next.phase());
                self.controller = next;
                self.report_ok(message);
                if self.controller.phase() == Phase::Test {
                    if let Some(input) = self.pending_input.take() {
                        self.reset(&input);
                    }
                }
            }
            Err(e) => self.report_err(&e),
        }
    }

    fn reset(&mut self, input: &str) {
        let result = self.controller.reset(input, &mut self.visualizer);
        self.report(result, &format!("Simulating '{}'", input.trim()));
    }

    fn report(&mut self, result: Result<PhaseState, SessionError>, action: &str) {
        self.log_scroll = usize::MAX;
        match result {
            Ok(PhaseState::PhaseComplete) => {
                let phase = self.controller.phase();
                let hint = match phase.next() {
                    Some(next) => format!("{} phase complete; n for {}", phase, next),
                    None => format!("{} phase complete", phase),
                };
                self.report_ok(hint);
            }
            Ok(_) => self.report_ok(action),
            Err(e) => self.report_err(&e),
        }
    }

    fn report_ok(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.is_error = false;
    }

    fn report_err(&mut self, err: &SessionError) {
        self.is_playing = false;
        self.status_message = err.to_string();
        self.is_error = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycle_round_trip() {
        let mut pane = FocusedPane::Grammar;
        for _ in 0..5 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Grammar);
        assert_eq!(FocusedPane::Grammar.prev(), FocusedPane::Log);
        assert_eq!(FocusedPane::Log.next().prev(), FocusedPane::Log);
    }
}

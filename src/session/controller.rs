//! Per-phase session controller
//!
//! A [`SessionController`] owns one environment, one step script and one
//! cursor for a single [`Phase`]. The UI drives it with `step`, `finish`
//! and (in the test phase) `reset`; a completed phase hands a deep copy of
//! its environment to the next phase's controller.

use super::errors::SessionError;
use super::validate::validate_input;
use crate::model::env::{INIT_TEST_SECTION, PARSE_TABLE_SECTION, TEST_SECTION};
use crate::model::ParsingEnv;
use crate::replay::{self, ScriptExecutionError, Stop, Visualizer};
use crate::script::StepScript;
use crate::tool::{self, AnalysisRequest, AnalysisTool};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The analysis phases, in UI order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Grammar,
    Attributes,
    Automaton,
    ParseTable,
    Test,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Grammar,
        Phase::Attributes,
        Phase::Automaton,
        Phase::ParseTable,
        Phase::Test,
    ];

    /// Section marker at which this phase begins
    pub fn entry_section(self) -> Option<&'static str> {
        match self {
            Phase::Grammar => None,
            Phase::Attributes => Some("Attributes"),
            Phase::Automaton => Some("DFA"),
            Phase::ParseTable => Some(PARSE_TABLE_SECTION),
            Phase::Test => Some(TEST_SECTION),
        }
    }

    /// Sections that belong to this phase; any other marker ends it
    pub fn own_sections(self) -> &'static [&'static str] {
        match self {
            Phase::Grammar => &[],
            Phase::Attributes => &["Attributes"],
            Phase::Automaton => &["DFA"],
            Phase::ParseTable => &[PARSE_TABLE_SECTION],
            Phase::Test => &[TEST_SECTION, INIT_TEST_SECTION],
        }
    }

    /// Section applied in full right after entry, before the first step
    pub fn setup_section(self) -> Option<&'static str> {
        match self {
            Phase::Test => Some(INIT_TEST_SECTION),
            _ => None,
        }
    }

    pub fn supports_reset(self) -> bool {
        matches!(self, Phase::Test)
    }

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Grammar => Some(Phase::Attributes),
            Phase::Attributes => Some(Phase::Automaton),
            Phase::Automaton => Some(Phase::ParseTable),
            Phase::ParseTable => Some(Phase::Test),
            Phase::Test => None,
        }
    }

    fn owns(self, section: &str) -> bool {
        self.own_sections().contains(&section)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Grammar => write!(f, "Grammar"),
            Phase::Attributes => write!(f, "Attributes"),
            Phase::Automaton => write!(f, "Automaton"),
            Phase::ParseTable => write!(f, "Parse Table"),
            Phase::Test => write!(f, "Test"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    /// No script loaded (or the last one failed)
    Idle,
    Running,
    /// Only `fork` (and `reset` in the test phase) make progress from here
    PhaseComplete,
}

/// The script being replayed and where we are in it
#[derive(Debug, Clone)]
struct Run {
    env: ParsingEnv,
    script: StepScript,
    cursor: usize,
}

pub struct SessionController {
    phase: Phase,
    tool: Arc<dyn AnalysisTool>,
    deadline: Duration,
    /// Environment handed over from the previous phase
    initial: Option<ParsingEnv>,
    request: Option<AnalysisRequest>,
    run: Option<Run>,
    state: PhaseState,
}

impl SessionController {
    pub fn new(phase: Phase, tool: Arc<dyn AnalysisTool>, deadline: Duration) -> Self {
        SessionController {
            phase,
            tool,
            deadline,
            initial: None,
            request: None,
            run: None,
            state: PhaseState::Idle,
        }
    }

    /// Controller that starts from a forked environment instead of an empty one
    pub fn with_env(
        phase: Phase,
        tool: Arc<dyn AnalysisTool>,
        deadline: Duration,
        env: ParsingEnv,
    ) -> Self {
        SessionController {
            initial: Some(env),
            ..Self::new(phase, tool, deadline)
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn env(&self) -> Option<&ParsingEnv> {
        self.run.as_ref().map(|r| &r.env)
    }

    pub fn script(&self) -> Option<&StepScript> {
        self.run.as_ref().map(|r| &r.script)
    }

    pub fn cursor(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.cursor)
    }

    pub fn request(&self) -> Option<&AnalysisRequest> {
        self.request.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.state == PhaseState::PhaseComplete
    }

    /// Run the analysis tool and position the new script at this phase.
    ///
    /// A tool failure leaves the controller exactly as it was.
    pub fn start(
        &mut self,
        request: AnalysisRequest,
        vis: &mut dyn Visualizer,
    ) -> Result<PhaseState, SessionError> {
        let script = tool::invoke_with_deadline(&self.tool, &request, self.deadline)?;
        self.request = Some(request);
        self.load_script(script, vis)
    }

    /// Position an already obtained script at this phase
    pub fn load_script(
        &mut self,
        script: StepScript,
        vis: &mut dyn Visualizer,
    ) -> Result<PhaseState, SessionError> {
        let mut env = match (&self.initial, script.header()) {
            (Some(env), _) => env.fork(),
            (None, Some(header)) => ParsingEnv::with_capacity(header.symbols, header.productions),
            (None, None) => ParsingEnv::new(),
        };

        // A handed-over environment already holds everything before the
        // entry marker.
        let replay_prefix = self.initial.is_none();
        let cursor = match self.enter(&script, &mut env, replay_prefix, vis) {
            Ok(cursor) => cursor,
            Err(err) => {
                self.discard(&err);
                return Err(err.into());
            }
        };

        log::debug!(
            "{} phase entered at step {} of {}",
            self.phase,
            cursor,
            script.len()
        );
        Ok(self.install(env, script, cursor))
    }

    fn install(&mut self, env: ParsingEnv, script: StepScript, cursor: usize) -> PhaseState {
        self.state = if cursor >= script.len() {
            PhaseState::PhaseComplete
        } else {
            PhaseState::Running
        };
        self.run = Some(Run {
            env,
            script,
            cursor,
        });
        self.state
    }

    /// Move from the start of `script` to this phase's first step, either
    /// applying the commands before the entry marker or skipping them.
    fn enter(
        &self,
        script: &StepScript,
        env: &mut ParsingEnv,
        replay_prefix: bool,
        vis: &mut dyn Visualizer,
    ) -> Result<usize, ScriptExecutionError> {
        let mut cursor = 0;

        if let Some(entry) = self.phase.entry_section() {
            loop {
                let stop = if replay_prefix {
                    replay::advance_through_section(script, cursor, env, vis)?
                } else {
                    replay::skip_through_section(script, cursor, env, vis)?
                };
                cursor = stop.next_cursor(script.len());
                match stop {
                    Stop::End => return Ok(cursor),
                    // The halting command itself, not env.section: a handed
                    // over environment still carries the previous section.
                    Stop::At(offset) if section_at(script, offset) == Some(entry) => break,
                    Stop::At(_) => {}
                }
            }
        }

        if let Some(setup) = self.phase.setup_section() {
            if script.find_section(setup, cursor).is_some() {
                loop {
                    let stop = replay::advance_through_section(script, cursor, env, vis)?;
                    cursor = stop.next_cursor(script.len());
                    match stop {
                        Stop::At(offset) if section_at(script, offset) != Some(setup) => {}
                        _ => break,
                    }
                }
            }
        }

        Ok(cursor)
    }

    /// Apply up to and including the next narration or section marker.
    pub fn step(&mut self, vis: &mut dyn Visualizer) -> Result<PhaseState, SessionError> {
        self.ensure_loaded()?;
        if self.state == PhaseState::PhaseComplete {
            return Ok(self.state);
        }
        let result = match self.run.as_mut() {
            Some(run) => replay::advance_one(&run.script, run.cursor, &mut run.env, vis),
            None => return Err(not_loaded()),
        };
        self.settle(result)
    }

    /// Run to the end of the phase; same result as stepping until complete.
    pub fn finish(&mut self, vis: &mut dyn Visualizer) -> Result<PhaseState, SessionError> {
        self.ensure_loaded()?;
        while self.state == PhaseState::Running {
            let result = match self.run.as_mut() {
                Some(run) => {
                    replay::advance_through_section(&run.script, run.cursor, &mut run.env, vis)
                }
                None => return Err(not_loaded()),
            };
            self.settle(result)?;
        }
        Ok(self.state)
    }

    /// Record where a stepping call halted and whether the phase is over
    fn settle(
        &mut self,
        result: Result<Stop, ScriptExecutionError>,
    ) -> Result<PhaseState, SessionError> {
        let stop = match result {
            Ok(stop) => stop,
            Err(err) => {
                self.discard(&err);
                return Err(err.into());
            }
        };
        let Some(run) = self.run.as_mut() else {
            return Err(not_loaded());
        };

        run.cursor = stop.next_cursor(run.script.len());
        let left_phase = match stop {
            Stop::At(offset) => {
                section_at(&run.script, offset).is_some_and(|name| !self.phase.owns(name))
            }
            Stop::End => false,
        };
        if left_phase || run.cursor >= run.script.len() {
            log::debug!("{} phase complete at step {}", self.phase, run.cursor);
            self.state = PhaseState::PhaseComplete;
        }
        Ok(self.state)
    }

    /// Independent copy of the finished environment for the next phase
    pub fn fork(&self) -> Result<ParsingEnv, SessionError> {
        match (&self.run, self.state) {
            (Some(run), PhaseState::PhaseComplete) => Ok(run.env.fork()),
            _ => Err(SessionError::InvalidState(format!(
                "{} phase is not complete",
                self.phase
            ))),
        }
    }

    /// Controller for the next phase, seeded with a fork of this environment
    pub fn next_phase(&self) -> Result<SessionController, SessionError> {
        let next = self.phase.next().ok_or_else(|| {
            SessionError::InvalidState(format!("{} is the last phase", self.phase))
        })?;
        let mut controller =
            SessionController::with_env(next, Arc::clone(&self.tool), self.deadline, self.fork()?);
        controller.request = self.request.clone();
        Ok(controller)
    }

    /// Re-run the simulation with new input, keeping grammar, automaton and
    /// parse table.
    ///
    /// Input is validated against the current symbols before the tool runs;
    /// a validation or tool failure leaves everything untouched.
    pub fn reset(
        &mut self,
        input: &str,
        vis: &mut dyn Visualizer,
    ) -> Result<PhaseState, SessionError> {
        if !self.phase.supports_reset() {
            return Err(SessionError::InvalidState(format!(
                "{} phase cannot be reset",
                self.phase
            )));
        }
        let env = self.env().ok_or_else(not_loaded)?;
        let tokens = validate_input(env, input)?;
        let request = self
            .request
            .as_ref()
            .ok_or_else(|| SessionError::InvalidState("no analysis to re-run".to_string()))?
            .with_input(tokens);

        let script = tool::invoke_with_deadline(&self.tool, &request, self.deadline)?;

        let mut env = match self.run.take() {
            Some(run) => run.env,
            None => return Err(not_loaded()),
        };
        env.reset_simulation();
        self.state = PhaseState::Idle;
        self.request = Some(request);

        let cursor = match self.enter(&script, &mut env, false, vis) {
            Ok(cursor) => cursor,
            Err(err) => {
                self.discard(&err);
                return Err(err.into());
            }
        };
        log::debug!("test simulation reset, resuming at step {}", cursor);
        Ok(self.install(env, script, cursor))
    }

    fn ensure_loaded(&self) -> Result<(), SessionError> {
        match self.state {
            PhaseState::Idle => Err(not_loaded()),
            _ => Ok(()),
        }
    }

    /// Drop a corrupted environment after a failed command
    fn discard(&mut self, err: &ScriptExecutionError) {
        log::warn!("discarding {} environment: {}", self.phase, err);
        self.run = None;
        self.state = PhaseState::Idle;
    }
}

fn section_at(script: &StepScript, offset: usize) -> Option<&str> {
    script.get(offset).and_then(|l| l.command.section_name())
}

fn not_loaded() -> SessionError {
    SessionError::InvalidState("no step script loaded".to_string())
}

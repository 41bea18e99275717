//! Boundary to the external grammar analysis tool
//!
//! The analysis itself (attributes, automaton, parse table, simulation) runs
//! elsewhere. This module only describes a request, hands it to an
//! [`AnalysisTool`] and bounds how long the caller waits for the resulting
//! [`StepScript`].

pub mod lrparser;

pub use lrparser::{LrParserTool, ToolConfig};

use crate::script::StepScript;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// End-of-input marker appended to simulation input
pub const END_MARKER: &str = "$";

/// Which LR automaton the tool builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum ParserMode {
    #[value(name = "lr0")]
    Lr0,
    #[value(name = "slr")]
    Slr,
    #[default]
    #[value(name = "lalr")]
    Lalr,
    #[value(name = "lr1")]
    Lr1,
}

impl ParserMode {
    /// Argument passed on the tool's command line
    pub fn arg(self) -> &'static str {
        match self {
            ParserMode::Lr0 => "lr0",
            ParserMode::Slr => "slr",
            ParserMode::Lalr => "lalr",
            ParserMode::Lr1 => "lr1",
        }
    }
}

impl fmt::Display for ParserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParserMode::Lr0 => "LR(0)",
            ParserMode::Slr => "SLR(1)",
            ParserMode::Lalr => "LALR(1)",
            ParserMode::Lr1 => "LR(1)",
        };
        write!(f, "{}", name)
    }
}

/// Where the grammar comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarSource {
    File(PathBuf),
    /// Grammar text; written to the output directory before invocation
    Text(String),
}

/// One invocation of the analysis tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub grammar: GrammarSource,
    pub mode: ParserMode,
    /// Simulation input tokens; `None` skips the test simulation
    pub input: Option<Vec<String>>,
}

impl AnalysisRequest {
    pub fn new(grammar: GrammarSource, mode: ParserMode) -> Self {
        AnalysisRequest {
            grammar,
            mode,
            input: None,
        }
    }

    /// Same grammar and mode with different simulation input
    pub fn with_input(&self, tokens: Vec<String>) -> Self {
        AnalysisRequest {
            input: Some(tokens),
            ..self.clone()
        }
    }

    /// Input as written to the tool: tokens separated by spaces, ending
    /// with the end marker.
    pub fn input_line(&self) -> Option<String> {
        let tokens = self.input.as_ref()?;
        let mut line = tokens.join(" ");
        if tokens.last().map(String::as_str) != Some(END_MARKER) {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(END_MARKER);
        }
        Some(line)
    }
}

/// Failure to obtain a step script
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolInvocationError {
    #[error("analysis tool not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to launch analysis tool: {0}")]
    Spawn(String),

    #[error("analysis tool exited with {}: {stderr}", describe_status(.status))]
    Exited { status: Option<i32>, stderr: String },

    #[error("analysis tool did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("analysis tool I/O error: {0}")]
    Io(String),

    #[error("analysis tool stopped without a result")]
    Disconnected,
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Something that turns an analysis request into a step script
pub trait AnalysisTool: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest) -> Result<StepScript, ToolInvocationError>;
}

impl<F> AnalysisTool for F
where
    F: Fn(&AnalysisRequest) -> Result<StepScript, ToolInvocationError> + Send + Sync,
{
    fn analyze(&self, request: &AnalysisRequest) -> Result<StepScript, ToolInvocationError> {
        self(request)
    }
}

/// Run `tool` on a worker thread and wait at most `deadline` for it.
///
/// On timeout the worker is abandoned; whatever it eventually returns is
/// dropped.
pub fn invoke_with_deadline(
    tool: &Arc<dyn AnalysisTool>,
    request: &AnalysisRequest,
    deadline: Duration,
) -> Result<StepScript, ToolInvocationError> {
    let (tx, rx) = mpsc::channel();
    let worker_tool = Arc::clone(tool);
    let worker_request = request.clone();

    log::debug!(
        "invoking analysis tool ({}, input {:?})",
        request.mode,
        request.input_line()
    );
    thread::Builder::new()
        .name("analysis-tool".to_string())
        .spawn(move || {
            // The receiver is gone if the caller already timed out
            let _ = tx.send(worker_tool.analyze(&worker_request));
        })
        .map_err(|e| ToolInvocationError::Spawn(e.to_string()))?;

    match rx.recv_timeout(deadline) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            log::warn!("analysis tool timed out after {:?}", deadline);
            Err(ToolInvocationError::TimedOut(deadline))
        }
        Err(RecvTimeoutError::Disconnected) => Err(ToolInvocationError::Disconnected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(GrammarSource::Text("E -> id".to_string()), ParserMode::Slr)
    }

    #[test]
    fn test_input_line_appends_end_marker() {
        let r = request();
        assert_eq!(r.input_line(), None);
        assert_eq!(
            r.with_input(vec!["id".into(), "+".into(), "id".into()])
                .input_line()
                .as_deref(),
            Some("id + id $")
        );
        assert_eq!(
            r.with_input(vec!["id".into(), "$".into()]).input_line().as_deref(),
            Some("id $")
        );
        assert_eq!(r.with_input(vec![]).input_line().as_deref(), Some("$"));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ParserMode::Lr0.arg(), "lr0");
        assert_eq!(ParserMode::Lalr.to_string(), "LALR(1)");
        assert_eq!(ParserMode::Slr.to_string(), "SLR(1)");
    }

    #[test]
    fn test_closure_tool_within_deadline() {
        let tool: Arc<dyn AnalysisTool> =
            Arc::new(|_: &AnalysisRequest| -> Result<StepScript, ToolInvocationError> {
                Ok(StepScript::from_lines(["#! Attributes"]))
            });
        let script = invoke_with_deadline(&tool, &request(), Duration::from_secs(5)).unwrap();
        assert_eq!(script.len(), 1);
    }

    #[test]
    fn test_slow_tool_times_out() {
        let tool: Arc<dyn AnalysisTool> = Arc::new(
            |_: &AnalysisRequest| -> Result<StepScript, ToolInvocationError> {
                thread::sleep(Duration::from_secs(2));
                Ok(StepScript::default())
            },
        );
        let err = invoke_with_deadline(&tool, &request(), Duration::from_millis(50)).unwrap_err();
        assert_eq!(err, ToolInvocationError::TimedOut(Duration::from_millis(50)));
    }

    #[test]
    fn test_panicking_tool_disconnects() {
        let tool: Arc<dyn AnalysisTool> =
            Arc::new(|_: &AnalysisRequest| -> Result<StepScript, ToolInvocationError> {
                panic!("tool crashed")
            });
        let err = invoke_with_deadline(&tool, &request(), Duration::from_secs(5)).unwrap_err();
        assert_eq!(err, ToolInvocationError::Disconnected);
    }
}

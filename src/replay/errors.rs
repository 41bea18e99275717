//! Errors raised while applying step script commands

use crate::model::QueueKind;
use thiserror::Error;

/// Why a command could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecErrorKind {
    #[error("malformed command: {0}")]
    Malformed(String),

    #[error("grammar is frozen after the parse table section; cannot modify {0}")]
    GrammarFrozen(&'static str),

    #[error("{0} changed before the test section")]
    QueueOutsideTest(QueueKind),

    #[error("{what} index {index} is out of range (limit {limit})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("pop from empty {0}")]
    EmptyQueue(QueueKind),

    #[error("state {0} has not been added")]
    UnknownState(usize),

    #[error("parse tree node {0} has not been added")]
    UnknownNode(usize),

    #[error("symbol {member} in {set} set of symbol {symbol} is a nonterminal")]
    NonterminalMember {
        symbol: usize,
        member: usize,
        set: &'static str,
    },
}

/// A command that failed during replay
///
/// The environment it was applied to must be discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step {offset} (line {line}) `{command}`: {kind}")]
pub struct ScriptExecutionError {
    /// Zero-based command offset in the script
    pub offset: usize,
    /// 1-based line in the tool output
    pub line: usize,
    pub command: String,
    pub kind: ExecErrorKind,
}

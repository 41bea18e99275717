use super::validate::ValidationError;
use crate::replay::ScriptExecutionError;
use crate::tool::ToolInvocationError;
use thiserror::Error;

/// Everything a session operation can report to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The previous environment, if any, is unchanged
    #[error(transparent)]
    Tool(#[from] ToolInvocationError),

    /// The environment has been discarded
    #[error(transparent)]
    Script(#[from] ScriptExecutionError),

    /// Rejected before the tool was run
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidState(String),
}

//! Stepped replay of step scripts
//!
//! The engine walks a [`StepScript`](crate::script::StepScript) forward over
//! a [`ParsingEnv`](crate::model::ParsingEnv), reporting every observable
//! event to a [`Visualizer`] supplied by the caller. Commands are applied
//! strictly in script order and an applied command is never rolled back.

pub mod engine;
pub mod errors;
pub mod visualizer;

pub use engine::{
    advance_one, advance_skipping, advance_through_section, apply, skip_through_section, Stop,
};
pub use errors::{ExecErrorKind, ScriptExecutionError};
pub use visualizer::{
    LogVisualizer, NullVisualizer, QueueOp, RecordingVisualizer, VisualEvent, Visualizer,
};

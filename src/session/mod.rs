//! Phase-by-phase replay sessions
//!
//! One [`SessionController`] per analysis [`Phase`]. Controllers never share
//! an environment; the next phase receives a fork.

pub mod controller;
pub mod errors;
pub mod validate;

pub use controller::{Phase, PhaseState, SessionController};
pub use errors::SessionError;
pub use validate::{validate_input, ValidationError};

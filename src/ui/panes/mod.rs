//! TUI pane rendering modules
//!
//! - [`grammar`]: symbols with FIRST/FOLLOW sets, then productions
//! - [`automaton`]: LR states and their transitions
//! - [`table`]: the parse table grid and conflict explanations
//! - [`simulation`]: stacks, input queue and parse tree
//! - [`activity`]: activity reported by the visualizer
//! - [`status`]: status bar with keybindings and phase state
//!
//! Each pane exports one `render_*` function taking the environment (or
//! what it needs of it) plus its focus flag and scroll offset.

mod utils;

pub mod activity;
pub mod automaton;
pub mod grammar;
pub mod simulation;
pub mod status;
pub mod table;

pub use activity::render_activity_pane;
pub use automaton::render_automaton_pane;
pub use grammar::render_grammar_pane;
pub use simulation::render_simulation_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use table::render_table_pane;

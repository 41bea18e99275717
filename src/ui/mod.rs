//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, input mode
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: centralized color palette used by all panes
//! - **[`visualizer`]**: the [`Visualizer`](crate::replay::Visualizer) the app
//!   replays through, keeping the activity log and recent changes
//!
//! Construct [`App`] with a started controller and call [`App::run`].
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;
pub mod visualizer;

pub use app::App;
pub use visualizer::TuiVisualizer;

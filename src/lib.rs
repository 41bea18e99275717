//! # Introduction
//!
//! lrstep replays the step script an LR grammar analyser writes while it
//! works, one narration at a time, and shows the growing grammar, automaton,
//! parse table and shift-reduce simulation in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Grammar → lrparser tool → step script → Commands → ParsingEnv → Visualizer
//! ```
//!
//! 1. [`tool`]: runs the external analyser under a deadline and reads back
//!    its script.
//! 2. [`script`]: lexes and classifies every script line into a
//!    [`script::Command`].
//! 3. [`model`]: the [`model::ParsingEnv`] the commands mutate.
//! 4. [`replay`]: applies commands and the four stepping primitives, reporting
//!    visible changes to a [`replay::Visualizer`].
//! 5. [`session`]: one controller per analysis phase, handing forked
//!    environments forward.
//! 6. [`headless`] and [`ui`]: the two front ends.

pub mod config;
pub mod headless;
pub mod model;
pub mod replay;
pub mod script;
pub mod session;
pub mod tool;
pub mod ui;

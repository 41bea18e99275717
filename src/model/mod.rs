//! Data model mutated by step scripts
//!
//! This module provides the records the replay engine writes into:
//! - [`growing`]: [`GrowingContainer`], the auto-extending sequence behind every collection
//! - [`symbol`]: grammar [`Symbol`]s and [`Production`]s
//! - [`table`]: typed [`Action`] codes and conflict-aware [`ActionCell`]s
//! - [`automaton`]: automaton states/edges and the parse-tree [`Forest`]
//! - [`env`]: the [`ParsingEnv`] aggregate root
//!
//! # Lifecycle
//!
//! Symbols and productions are appended during the definition phases and
//! frozen once the "Parse Table" section begins. The table is filled cell by
//! cell during that section. The three queues only move during the test
//! simulation.

pub mod automaton;
pub mod env;
pub mod growing;
pub mod symbol;
pub mod table;

pub use automaton::{Automaton, Edge, Forest, StateNode, TreeNode};
pub use env::{IndexLimits, ParsingEnv, QueueEnd, QueueKind};
pub use growing::GrowingContainer;
pub use symbol::{Production, Symbol};
pub use table::{Action, ActionCell, ParseTable};

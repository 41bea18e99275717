//! The parsing environment mutated by step scripts
//!
//! [`ParsingEnv`] is pure data. Visualization callbacks are never stored in
//! it; the replay engine receives them as a separate argument. Forking is a
//! plain `Clone`, which copies every field and shares nothing.

use super::automaton::{Automaton, Forest};
use super::growing::GrowingContainer;
use super::symbol::{Production, Symbol};
use super::table::{self, ParseTable};
use std::collections::VecDeque;
use std::fmt;

/// Section name at which the grammar becomes read-only
pub const PARSE_TABLE_SECTION: &str = "Parse Table";

/// Section names after which the simulation queues may change
pub const TEST_SECTION: &str = "Test";
pub const INIT_TEST_SECTION: &str = "Init Test";

/// Bound on any index the script header does not size
pub const MAX_INDEX: usize = 1 << 16;

/// Exclusive upper bounds on the indices a script may address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLimits {
    pub symbols: usize,
    pub productions: usize,
    pub states: usize,
    pub nodes: usize,
}

impl Default for IndexLimits {
    fn default() -> Self {
        IndexLimits {
            symbols: MAX_INDEX,
            productions: MAX_INDEX,
            states: MAX_INDEX,
            nodes: MAX_INDEX,
        }
    }
}

/// The three replay-visible queues of the shift-reduce simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    SymbolStack,
    StateStack,
    InputQueue,
}

impl QueueKind {
    pub const ALL: [QueueKind; 3] = [
        QueueKind::SymbolStack,
        QueueKind::StateStack,
        QueueKind::InputQueue,
    ];

    /// Name used in step scripts
    pub fn script_name(self) -> &'static str {
        match self {
            QueueKind::SymbolStack => "symbol_stack",
            QueueKind::StateStack => "state_stack",
            QueueKind::InputQueue => "input_queue",
        }
    }

    pub fn from_script_name(name: &str) -> Option<Self> {
        QueueKind::ALL
            .into_iter()
            .find(|kind| kind.script_name() == name)
    }

    /// Whether values are symbol indices (as opposed to state numbers)
    pub fn holds_symbols(self) -> bool {
        !matches!(self, QueueKind::StateStack)
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueKind::SymbolStack => write!(f, "symbol stack"),
            QueueKind::StateStack => write!(f, "state stack"),
            QueueKind::InputQueue => write!(f, "input queue"),
        }
    }
}

/// Which end of a queue an operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEnd {
    /// Top of a stack, end of the input queue
    Back,
    /// Bottom of a stack, front of the input queue
    Front,
}

/// Aggregate root for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingEnv {
    pub symbols: GrowingContainer<Symbol>,
    pub productions: GrowingContainer<Production>,
    pub table: ParseTable,
    pub symbol_stack: VecDeque<usize>,
    pub state_stack: VecDeque<usize>,
    pub input_queue: VecDeque<usize>,
    pub automaton: Automaton,
    pub forest: Forest,
    /// Name of the last section marker applied
    pub section: Option<String>,
    /// Text of the last narration applied
    pub message: Option<String>,
    /// Set once the parse table section begins; symbols and productions are
    /// read-only afterwards.
    pub frozen: bool,
    /// Set once the test section begins; the queues are read-only before.
    pub simulating: bool,
    pub limits: IndexLimits,
}

impl Default for ParsingEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsingEnv {
    pub fn new() -> Self {
        ParsingEnv {
            symbols: GrowingContainer::default(),
            productions: GrowingContainer::default(),
            table: table::new_table(),
            symbol_stack: VecDeque::new(),
            state_stack: VecDeque::new(),
            input_queue: VecDeque::new(),
            automaton: Automaton::default(),
            forest: Forest::default(),
            section: None,
            message: None,
            frozen: false,
            simulating: false,
            limits: IndexLimits::default(),
        }
    }

    /// Environment pre-sized from a script header. The header counts also
    /// bound the symbol and production indices.
    pub fn with_capacity(symbols: usize, productions: usize) -> Self {
        let mut env = Self::new();
        env.limits.symbols = symbols.min(MAX_INDEX);
        env.limits.productions = productions.min(MAX_INDEX);
        let (symbols, productions) = (env.limits.symbols, env.limits.productions);
        env.symbols = GrowingContainer::with_capacity(Symbol::default, symbols);
        env.productions = GrowingContainer::with_capacity(Production::default, productions);
        env
    }

    pub fn queue(&self, kind: QueueKind) -> &VecDeque<usize> {
        match kind {
            QueueKind::SymbolStack => &self.symbol_stack,
            QueueKind::StateStack => &self.state_stack,
            QueueKind::InputQueue => &self.input_queue,
        }
    }

    pub fn queue_mut(&mut self, kind: QueueKind) -> &mut VecDeque<usize> {
        match kind {
            QueueKind::SymbolStack => &mut self.symbol_stack,
            QueueKind::StateStack => &mut self.state_stack,
            QueueKind::InputQueue => &mut self.input_queue,
        }
    }

    /// Record that a section marker was applied
    pub fn enter_section(&mut self, name: &str) {
        match name {
            PARSE_TABLE_SECTION => self.frozen = true,
            TEST_SECTION | INIT_TEST_SECTION => self.simulating = true,
            _ => {}
        }
        self.section = Some(name.to_string());
    }

    /// Deep, independent copy for the next phase
    pub fn fork(&self) -> ParsingEnv {
        self.clone()
    }

    /// Clear the simulation state (queues and parse tree) while keeping the
    /// grammar, the automaton and the parse table.
    pub fn reset_simulation(&mut self) {
        self.symbol_stack.clear();
        self.state_stack.clear();
        self.input_queue.clear();
        self.forest.clear();
    }

    /// Render a queue's contents: symbol names for symbol queues, numbers for
    /// the state stack.
    pub fn render_queue(&self, kind: QueueKind) -> Vec<String> {
        self.queue(kind)
            .iter()
            .map(|&v| {
                if kind.holds_symbols() {
                    super::symbol::symbol_name(&self.symbols, v)
                } else {
                    v.to_string()
                }
            })
            .collect()
    }
}

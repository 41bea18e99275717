//! Parse table cells and action codes
//!
//! The table is addressed `[state][symbol]`. Each cell holds a set of
//! [`Action`]s; a cell with two or more actions is a grammar conflict and is
//! reported as such, never resolved.

use super::growing::GrowingContainer;
use super::symbol::{Production, Symbol};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One parse table action code
///
/// Textual forms: `s<N>` shift, `r<N>` reduce, `<N>` goto, `acc` accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Goto(usize),
    Accept,
}

/// Error returned when an action code cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed action code '{0}'")]
pub struct ActionParseError(pub String);

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ActionParseError(s.to_string());
        if s == "acc" {
            return Ok(Action::Accept);
        }
        if let Some(n) = s.strip_prefix('s') {
            return parse_number(n).map(Action::Shift).ok_or_else(err);
        }
        if let Some(n) = s.strip_prefix('r') {
            return parse_number(n).map(Action::Reduce).ok_or_else(err);
        }
        parse_number(s).map(Action::Goto).ok_or_else(err)
    }
}

/// Plain decimal digits only; `usize::from_str` alone also takes a `+` sign.
fn parse_number(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(n) => write!(f, "s{}", n),
            Action::Reduce(n) => write!(f, "r{}", n),
            Action::Goto(n) => write!(f, "{}", n),
            Action::Accept => write!(f, "acc"),
        }
    }
}

impl Action {
    /// Human-readable explanation of the action
    pub fn explain(
        &self,
        symbols: &GrowingContainer<Symbol>,
        productions: &GrowingContainer<Production>,
    ) -> String {
        match self {
            Action::Shift(n) => format!("Shift and goto state {}", n),
            Action::Reduce(n) => match productions.peek(*n) {
                Some(p) => format!("Reduce by production: {}", p.render(symbols)),
                None => format!("Reduce by production {}", n),
            },
            Action::Goto(n) => format!("Goto state {}", n),
            Action::Accept => String::from("Success"),
        }
    }
}

/// The set of actions recorded for one `[state][symbol]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionCell {
    actions: BTreeSet<Action>,
}

impl ActionCell {
    /// Insert an action; returns `false` if it was already present.
    pub fn insert(&mut self, action: Action) -> bool {
        self.actions.insert(action)
    }

    /// More than one action: shift/reduce and reduce/reduce alike.
    pub fn has_conflict(&self) -> bool {
        self.actions.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// One explanation line per action, plus a conflict marker
    pub fn explain(
        &self,
        symbols: &GrowingContainer<Symbol>,
        productions: &GrowingContainer<Production>,
    ) -> Vec<String> {
        let mut lines: Vec<String> = self
            .actions
            .iter()
            .map(|a| a.explain(symbols, productions))
            .collect();
        if self.has_conflict() {
            lines.push(String::from("[Conflicts]"));
        }
        lines
    }
}

impl fmt::Display for ActionCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for action in &self.actions {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}

/// Row type of the parse table
pub type TableRow = GrowingContainer<ActionCell>;

/// The `[state][symbol]` parse table
pub type ParseTable = GrowingContainer<TableRow>;

fn new_row() -> TableRow {
    GrowingContainer::default()
}

/// An empty parse table whose rows grow on demand as well
pub fn new_table() -> ParseTable {
    GrowingContainer::new(new_row)
}

/// Every `(state, symbol)` whose cell holds a conflict, in table order
pub fn conflicts(table: &ParseTable) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    for (state, row) in table.iter().enumerate() {
        for (symbol, cell) in row.iter().enumerate() {
            if cell.has_conflict() {
                found.push((state, symbol));
            }
        }
    }
    found
}

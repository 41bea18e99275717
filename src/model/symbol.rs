//! Grammar symbols and productions
//!
//! Both records start out as an empty "new" value (everything unset) and are
//! filled in field by field by step script commands. Identity is the index in
//! the owning container, never the name.

use super::growing::GrowingContainer;
use std::collections::BTreeSet;

/// One terminal or nonterminal of the grammar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// `None` until the script says which kind of symbol this is
    pub terminal: Option<bool>,
    pub start: Option<bool>,
    /// Indices of productions headed by this symbol, in script order
    pub productions: Vec<usize>,
    /// Only meaningful for nonterminals
    pub nullable: Option<bool>,
    pub first: BTreeSet<usize>,
    pub follow: BTreeSet<usize>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, terminal: bool, start: bool) -> Self {
        Symbol {
            name: name.into(),
            terminal: Some(terminal),
            start: Some(start),
            ..Symbol::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal == Some(true)
    }

    /// Explicitly marked as a nonterminal (unset does not count)
    pub fn is_nonterminal(&self) -> bool {
        self.terminal == Some(false)
    }
}

/// One grammar rule `head -> body`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Production {
    /// Symbol index, `None` until set
    pub head: Option<usize>,
    /// Symbol indices; empty means an ε-production
    pub body: Vec<usize>,
}

impl Production {
    pub fn new(head: usize, body: Vec<usize>) -> Self {
        Production {
            head: Some(head),
            body,
        }
    }

    /// Render as `head → body`, using symbol names where they exist and
    /// `#<index>` otherwise.
    pub fn render(&self, symbols: &GrowingContainer<Symbol>) -> String {
        let head = match self.head {
            Some(h) => symbol_name(symbols, h),
            None => String::from("?"),
        };
        format!("{} → {}", head, render_body(&self.body, symbols))
    }
}

/// Render a production body, `ε` when empty
pub fn render_body(body: &[usize], symbols: &GrowingContainer<Symbol>) -> String {
    if body.is_empty() {
        return String::from("ε");
    }
    body.iter()
        .map(|&i| symbol_name(symbols, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name of symbol `index`, falling back to `#index` for unnamed slots
pub fn symbol_name(symbols: &GrowingContainer<Symbol>, index: usize) -> String {
    match symbols.peek(index) {
        Some(sym) if !sym.name.is_empty() => sym.name.clone(),
        _ => format!("#{}", index),
    }
}

/// Render a FIRST/FOLLOW set as space-separated names
pub fn render_set(set: &BTreeSet<usize>, symbols: &GrowingContainer<Symbol>) -> String {
    set.iter()
        .map(|&i| symbol_name(symbols, i))
        .collect::<Vec<_>>()
        .join(" ")
}

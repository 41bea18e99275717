//! Visualizer that feeds the terminal UI
//!
//! The panes draw from the environment itself; this side keeps what the
//! environment does not: an activity log and which items changed last.

use crate::model::QueueKind;
use crate::replay::{QueueOp, Visualizer};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Oldest activity lines are dropped past this many
const LOG_CAPACITY: usize = 1000;

#[derive(Debug, Default)]
pub struct TuiVisualizer {
    log: VecDeque<String>,
    /// Handle -> state index
    states: FxHashMap<usize, usize>,
    edges: usize,
    /// State index most recently added or changed
    pub last_state: Option<usize>,
    /// Most recent queue movement
    pub last_queue: Option<(QueueKind, QueueOp)>,
    /// Parse tree node most recently added or attached
    pub last_node: Option<usize>,
}

impl TuiVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &VecDeque<String> {
        &self.log
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line.into());
    }

    fn state_index(&self, handle: usize) -> usize {
        self.states.get(&handle).copied().unwrap_or(handle)
    }
}

impl Visualizer for TuiVisualizer {
    fn add_state(&mut self, index: usize, description: &str) -> usize {
        let handle = self.states.len();
        self.states.insert(handle, index);
        self.last_state = Some(index);
        let first = description.lines().next().unwrap_or_default();
        self.push_log(format!("+ state {}  {}", index, first));
        handle
    }

    fn add_edge(&mut self, from: usize, to: usize, label: &str) -> usize {
        let (from, to) = (self.state_index(from), self.state_index(to));
        self.last_state = Some(to);
        self.push_log(format!("+ edge {} --{}--> {}", from, label, to));
        self.edges += 1;
        self.edges - 1
    }

    fn show(&mut self, text: &str) {
        self.push_log(text);
    }

    fn set_section(&mut self, name: &str) {
        self.push_log(format!("== {} ==", name));
    }

    fn update_state(&mut self, handle: usize, _description: &str) {
        let index = self.state_index(handle);
        self.last_state = Some(index);
        self.push_log(format!("~ state {}", index));
    }

    fn set_start(&mut self, handle: usize) {
        self.last_state = Some(self.state_index(handle));
    }

    fn set_final(&mut self, handle: usize) {
        self.last_state = Some(self.state_index(handle));
    }

    fn ast_add_node(&mut self, index: usize, _label: &str) {
        self.last_node = Some(index);
    }

    fn ast_set_parent(&mut self, _child: usize, parent: usize) {
        self.last_node = Some(parent);
    }

    fn queue_changed(&mut self, queue: QueueKind, op: QueueOp, _value: usize) {
        self.last_queue = Some((queue, op));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_logged_with_state_indices() {
        let mut vis = TuiVisualizer::new();
        let a = vis.add_state(4, "I4\nE -> . id");
        let b = vis.add_state(7, "I7");
        vis.add_edge(a, b, "id");

        assert_eq!(vis.log().back().map(String::as_str), Some("+ edge 4 --id--> 7"));
        assert_eq!(vis.log()[0], "+ state 4  I4");
        assert_eq!(vis.last_state, Some(7));
    }

    #[test]
    fn test_log_is_bounded() {
        let mut vis = TuiVisualizer::new();
        for i in 0..LOG_CAPACITY + 5 {
            vis.show(&i.to_string());
        }
        assert_eq!(vis.log().len(), LOG_CAPACITY);
        assert_eq!(vis.log()[0], "5");
    }
}

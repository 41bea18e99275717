//! The visualization capability passed alongside the environment
//!
//! The engine never stores a visualizer in the [`ParsingEnv`]. Each stepping
//! call receives one, so a forked environment is rebound by its new owner.
//!
//! [`ParsingEnv`]: crate::model::ParsingEnv

use crate::model::QueueKind;
use rustc_hash::FxHashMap;

/// A push or pop at one end of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueOp {
    PushBack,
    PushFront,
    PopBack,
    PopFront,
}

impl QueueOp {
    pub fn is_push(self) -> bool {
        matches!(self, QueueOp::PushBack | QueueOp::PushFront)
    }
}

/// Observer of every visible event produced by replay
///
/// Only the two allocators are required; their returned handles are stored
/// by the engine and must stay valid for the rest of the session.
pub trait Visualizer {
    /// Register automaton state `index`; returns a handle for it
    fn add_state(&mut self, index: usize, description: &str) -> usize;

    /// Register an edge between two state handles; returns a handle for it
    fn add_edge(&mut self, from: usize, to: usize, label: &str) -> usize;

    fn show(&mut self, _text: &str) {}

    fn set_section(&mut self, _name: &str) {}

    fn update_state(&mut self, _handle: usize, _description: &str) {}

    fn set_start(&mut self, _handle: usize) {}

    fn set_final(&mut self, _handle: usize) {}

    fn ast_add_node(&mut self, _index: usize, _label: &str) {}

    fn ast_set_parent(&mut self, _child: usize, _parent: usize) {}

    /// `value` is the logical value moved: a symbol index for the symbol
    /// stack and input queue, a state number for the state stack.
    fn queue_changed(&mut self, _queue: QueueKind, _op: QueueOp, _value: usize) {}
}

/// Visualizer that draws nothing; handles are the script's own indices
#[derive(Debug, Default, Clone)]
pub struct NullVisualizer {
    edges: usize,
}

impl Visualizer for NullVisualizer {
    fn add_state(&mut self, index: usize, _description: &str) -> usize {
        index
    }

    fn add_edge(&mut self, _from: usize, _to: usize, _label: &str) -> usize {
        self.edges += 1;
        self.edges - 1
    }
}

/// Visualizer that reports every event through the `log` facade
#[derive(Debug, Default)]
pub struct LogVisualizer {
    edges: usize,
    /// Handle -> script index, for readable messages
    states: FxHashMap<usize, usize>,
}

impl LogVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_index(&self, handle: usize) -> usize {
        self.states.get(&handle).copied().unwrap_or(handle)
    }
}

impl Visualizer for LogVisualizer {
    fn add_state(&mut self, index: usize, description: &str) -> usize {
        log::info!("state {}: {}", index, description.replace('\n', "; "));
        let handle = self.states.len();
        self.states.insert(handle, index);
        handle
    }

    fn add_edge(&mut self, from: usize, to: usize, label: &str) -> usize {
        log::info!(
            "edge {} --{}--> {}",
            self.state_index(from),
            label,
            self.state_index(to)
        );
        self.edges += 1;
        self.edges - 1
    }

    fn show(&mut self, text: &str) {
        log::info!("{}", text);
    }

    fn set_section(&mut self, name: &str) {
        log::info!("== {} ==", name);
    }

    fn update_state(&mut self, handle: usize, description: &str) {
        log::debug!(
            "state {} updated: {}",
            self.state_index(handle),
            description.replace('\n', "; ")
        );
    }

    fn set_start(&mut self, handle: usize) {
        log::debug!("state {} is the start state", self.state_index(handle));
    }

    fn set_final(&mut self, handle: usize) {
        log::debug!("state {} is final", self.state_index(handle));
    }

    fn ast_add_node(&mut self, index: usize, label: &str) {
        log::debug!("tree node {}: {}", index, label);
    }

    fn ast_set_parent(&mut self, child: usize, parent: usize) {
        log::debug!("tree node {} -> parent {}", child, parent);
    }

    fn queue_changed(&mut self, queue: QueueKind, op: QueueOp, value: usize) {
        log::trace!("{} {:?} {}", queue, op, value);
    }
}

/// One recorded visualizer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualEvent {
    Show(String),
    Section(String),
    AddState(usize, String),
    UpdateState(usize, String),
    AddEdge(usize, usize, String),
    SetStart(usize),
    SetFinal(usize),
    AstAddNode(usize, String),
    AstSetParent(usize, usize),
    Queue(QueueKind, QueueOp, usize),
}

/// Visualizer that records every call in order
///
/// State handles are offset by `handle_base` so callers can tell handles
/// apart from script indices.
#[derive(Debug, Default, Clone)]
pub struct RecordingVisualizer {
    pub events: Vec<VisualEvent>,
    pub handle_base: usize,
    next_state: usize,
    next_edge: usize,
}

impl RecordingVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle_base(handle_base: usize) -> Self {
        RecordingVisualizer {
            handle_base,
            ..Self::default()
        }
    }
}

impl Visualizer for RecordingVisualizer {
    fn add_state(&mut self, index: usize, description: &str) -> usize {
        self.events
            .push(VisualEvent::AddState(index, description.to_string()));
        self.next_state += 1;
        self.handle_base + self.next_state - 1
    }

    fn add_edge(&mut self, from: usize, to: usize, label: &str) -> usize {
        self.events
            .push(VisualEvent::AddEdge(from, to, label.to_string()));
        self.next_edge += 1;
        self.next_edge - 1
    }

    fn show(&mut self, text: &str) {
        self.events.push(VisualEvent::Show(text.to_string()));
    }

    fn set_section(&mut self, name: &str) {
        self.events.push(VisualEvent::Section(name.to_string()));
    }

    fn update_state(&mut self, handle: usize, description: &str) {
        self.events
            .push(VisualEvent::UpdateState(handle, description.to_string()));
    }

    fn set_start(&mut self, handle: usize) {
        self.events.push(VisualEvent::SetStart(handle));
    }

    fn set_final(&mut self, handle: usize) {
        self.events.push(VisualEvent::SetFinal(handle));
    }

    fn ast_add_node(&mut self, index: usize, label: &str) {
        self.events
            .push(VisualEvent::AstAddNode(index, label.to_string()));
    }

    fn ast_set_parent(&mut self, child: usize, parent: usize) {
        self.events.push(VisualEvent::AstSetParent(child, parent));
    }

    fn queue_changed(&mut self, queue: QueueKind, op: QueueOp, value: usize) {
        self.events.push(VisualEvent::Queue(queue, op, value));
    }
}

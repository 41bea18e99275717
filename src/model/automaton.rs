//! Automaton and parse-tree records built during replay
//!
//! The visualizer draws these; the environment keeps a data-only copy so a
//! forked environment (and the terminal UI) can show what was built without
//! access to the visualizer that was bound at the time.

use super::growing::GrowingContainer;

/// A state added with `addState`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateNode {
    pub description: String,
    /// Handle the visualizer returned for this state
    pub handle: usize,
    pub is_start: bool,
    pub is_final: bool,
}

/// An edge added with `addEdge`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub label: String,
    /// Handle the visualizer returned for this edge
    pub handle: usize,
}

/// States are sparse: the script numbers them, so slots that were never
/// added stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Automaton {
    pub states: GrowingContainer<Option<StateNode>>,
    pub edges: Vec<Edge>,
}

impl Automaton {
    pub fn state(&self, index: usize) -> Option<&StateNode> {
        self.states.peek(index).and_then(Option::as_ref)
    }

    pub fn state_mut(&mut self, index: usize) -> Option<&mut StateNode> {
        if index < self.states.len() {
            self.states.get_mut(index).as_mut()
        } else {
            None
        }
    }

    /// Iterate over `(index, state)` for every state that exists
    pub fn states(&self) -> impl Iterator<Item = (usize, &StateNode)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }

    pub fn state_count(&self) -> usize {
        self.states().count()
    }
}

/// A parse-tree node added with `astAddNode`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub parent: Option<usize>,
}

/// The parse forest grown during the shift-reduce simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    pub nodes: GrowingContainer<Option<TreeNode>>,
}

impl Forest {
    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.peek(index).and_then(Option::as_ref)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.node(index).is_some()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Nodes without a parent, in index order
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(node) if node.parent.is_none() => Some(i),
                _ => None,
            })
            .collect()
    }

    /// Children of `parent`, in index order
    pub fn children(&self, parent: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(node) if node.parent == Some(parent) => Some(i),
                _ => None,
            })
            .collect()
    }

    /// Indented outline of every tree, roots first
    pub fn outline(&self) -> Vec<String> {
        self.outline_indexed()
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    /// Like [`Forest::outline`], paired with the node index of each line
    pub fn outline_indexed(&self) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        for root in self.roots() {
            self.outline_into(root, 0, &mut lines);
        }
        lines
    }

    fn outline_into(&self, index: usize, depth: usize, lines: &mut Vec<(usize, String)>) {
        // A parent cycle would recurse forever; the tree is never deeper
        // than the number of nodes.
        if depth > self.nodes.len() {
            return;
        }
        if let Some(node) = self.node(index) {
            lines.push((index, format!("{}{}", "  ".repeat(depth), node.label)));
            for child in self.children(index) {
                self.outline_into(child, depth + 1, lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: &str, parent: Option<usize>) -> Option<TreeNode> {
        Some(TreeNode {
            label: label.to_string(),
            parent,
        })
    }

    #[test]
    fn test_forest_outline() {
        let mut forest = Forest::default();
        forest.nodes.set(0, node("id", Some(2)));
        forest.nodes.set(1, node("+", Some(2)));
        forest.nodes.set(2, node("E", None));

        assert_eq!(forest.roots(), vec![2]);
        assert_eq!(forest.children(2), vec![0, 1]);
        assert_eq!(forest.outline(), vec!["E", "  id", "  +"]);
    }

    #[test]
    fn test_sparse_states() {
        let mut automaton = Automaton::default();
        automaton.states.set(
            3,
            Some(StateNode {
                description: "S' -> .E".to_string(),
                handle: 3,
                is_start: true,
                is_final: false,
            }),
        );

        assert_eq!(automaton.state_count(), 1);
        assert!(automaton.state(0).is_none());
        assert!(automaton.state(3).is_some_and(|s| s.is_start));
        assert!(automaton.state_mut(7).is_none());
        assert_eq!(automaton.states.len(), 4);
    }
}

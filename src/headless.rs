//! Non-interactive replay: every phase driven to completion with `finish`

use crate::model::{symbol, table, ParsingEnv, QueueKind};
use crate::replay::{LogVisualizer, QueueOp, Visualizer};
use crate::session::{Phase, SessionController, SessionError};
use crate::tool::AnalysisRequest;
use std::io::Write;

/// Writes section headers and narration as a plain-text transcript; every
/// other event goes to the log.
pub struct TranscriptVisualizer<W: Write> {
    out: W,
    log: LogVisualizer,
}

impl<W: Write> TranscriptVisualizer<W> {
    pub fn new(out: W) -> Self {
        TranscriptVisualizer {
            out,
            log: LogVisualizer::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("transcript write failed: {}", e);
        }
    }
}

impl<W: Write> Visualizer for TranscriptVisualizer<W> {
    fn add_state(&mut self, index: usize, description: &str) -> usize {
        self.log.add_state(index, description)
    }

    fn add_edge(&mut self, from: usize, to: usize, label: &str) -> usize {
        self.log.add_edge(from, to, label)
    }

    fn show(&mut self, text: &str) {
        self.line(&format!("  {}", text));
    }

    fn set_section(&mut self, name: &str) {
        self.line(&format!("== {} ==", name));
    }

    fn update_state(&mut self, handle: usize, description: &str) {
        self.log.update_state(handle, description);
    }

    fn set_start(&mut self, handle: usize) {
        self.log.set_start(handle);
    }

    fn set_final(&mut self, handle: usize) {
        self.log.set_final(handle);
    }

    fn ast_add_node(&mut self, index: usize, label: &str) {
        self.log.ast_add_node(index, label);
    }

    fn ast_set_parent(&mut self, child: usize, parent: usize) {
        self.log.ast_set_parent(child, parent);
    }

    fn queue_changed(&mut self, queue: QueueKind, op: QueueOp, value: usize) {
        self.log.queue_changed(queue, op, value);
    }
}

/// Replay every phase of `request` and write a transcript plus a summary.
///
/// With `input`, the test phase is re-run on those tokens once the grammar
/// is known.
pub fn run<W: Write>(
    mut controller: SessionController,
    request: AnalysisRequest,
    input: Option<&str>,
    out: W,
) -> Result<W, SessionError> {
    let mut vis = TranscriptVisualizer::new(out);
    controller.start(request, &mut vis)?;

    loop {
        controller.finish(&mut vis)?;
        log::debug!("{} phase finished", controller.phase());

        if controller.phase() == Phase::Test {
            if let Some(input) = input {
                vis.line(&format!("-- test input: {} --", input));
                controller.reset(input, &mut vis)?;
                controller.finish(&mut vis)?;
            }
            break;
        }

        let script = controller.script().cloned().unwrap_or_default();
        let mut next = controller.next_phase()?;
        next.load_script(script, &mut vis)?;
        controller = next;
    }

    if let Some(env) = controller.env() {
        for line in summary(env) {
            vis.line(&line);
        }
    }
    Ok(vis.into_inner())
}

/// Closing report: grammar, automaton size, conflicts and the parse tree
pub fn summary(env: &ParsingEnv) -> Vec<String> {
    let mut lines = vec!["== Summary ==".to_string()];
    for (i, production) in env.productions.iter().enumerate() {
        lines.push(format!("  ({}) {}", i, production.render(&env.symbols)));
    }
    lines.push(format!(
        "  {} states, {} edges",
        env.automaton.state_count(),
        env.automaton.edges.len()
    ));

    let conflicts = table::conflicts(&env.table);
    if conflicts.is_empty() {
        lines.push("  no conflicts".to_string());
    }
    for (state, sym) in conflicts {
        let cell = env
            .table
            .peek(state)
            .and_then(|row| row.peek(sym))
            .map(|c| c.to_string())
            .unwrap_or_default();
        lines.push(format!(
            "  conflict in state {} on {}: {}",
            state,
            symbol::symbol_name(&env.symbols, sym),
            cell
        ));
    }

    let tree = env.forest.outline();
    if !tree.is_empty() {
        lines.push("  parse tree:".to_string());
        lines.extend(tree.into_iter().map(|l| format!("    {}", l)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{self, NullVisualizer};
    use crate::script::Command;

    #[test]
    fn test_summary_lists_conflicts() {
        let mut env = ParsingEnv::new();
        let mut vis = NullVisualizer::default();
        for line in [
            "addSymbol('E', false, true)",
            "addSymbol('id', true)",
            "addProduction(0, [1])",
            "table[2][1].add('s3')",
            "table[2][1].add('r0')",
        ] {
            replay::apply(&Command::parse(line), &mut env, &mut vis).unwrap();
        }

        let lines = summary(&env);
        assert!(lines.contains(&"  (0) E → id".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("  conflict in state 2 on id: ")));
        assert!(!lines.contains(&"  no conflicts".to_string()));
    }

    #[test]
    fn test_transcript_writes_sections_and_narration() {
        let mut vis = TranscriptVisualizer::new(Vec::new());
        vis.set_section("DFA");
        vis.show("closure of I0");
        assert_eq!(vis.add_state(0, "I0"), 0);

        let text = String::from_utf8(vis.into_inner()).unwrap();
        assert_eq!(text, "== DFA ==\n  closure of I0\n");
    }
}

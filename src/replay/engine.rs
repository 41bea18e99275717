//! Command dispatch and the four stepping primitives
//!
//! Every primitive takes `(script, cursor, env, visualizer)`, walks forward
//! from `cursor` and returns where it halted. The cursor is never moved
//! backwards; callers resume at [`Stop::next_cursor`].

use super::errors::{ExecErrorKind, ScriptExecutionError};
use super::visualizer::{QueueOp, Visualizer};
use crate::model::{
    Action, Edge, ParsingEnv, Production, QueueEnd, StateNode, Symbol, TreeNode,
};
use crate::script::{Command, Mutation, StepScript};

/// Where a stepping primitive stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Halted on the command at this offset
    At(usize),
    /// Ran off the end of the script
    End,
}

impl Stop {
    /// Cursor from which the next primitive should resume
    pub fn next_cursor(self, script_len: usize) -> usize {
        match self {
            Stop::At(offset) => offset + 1,
            Stop::End => script_len,
        }
    }
}

fn exec_error(script: &StepScript, offset: usize, kind: ExecErrorKind) -> ScriptExecutionError {
    let (line, command) = script
        .get(offset)
        .map(|l| (l.line, l.text.clone()))
        .unwrap_or_default();
    ScriptExecutionError {
        offset,
        line,
        command,
        kind,
    }
}

fn apply_at(
    script: &StepScript,
    offset: usize,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<(), ScriptExecutionError> {
    let Some(line) = script.get(offset) else {
        return Ok(());
    };
    log::trace!("apply [{}] {}", offset, line.text);
    apply(&line.command, env, vis).map_err(|kind| exec_error(script, offset, kind))
}

/// Apply one command to `env`, notifying `vis`.
pub fn apply(
    command: &Command,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<(), ExecErrorKind> {
    match command {
        Command::Section(name) => {
            env.enter_section(name);
            vis.set_section(name);
            Ok(())
        }
        Command::Narration(text) => {
            env.message = Some(text.clone());
            vis.show(text);
            Ok(())
        }
        Command::Malformed(reason) => Err(ExecErrorKind::Malformed(reason.clone())),
        Command::Mutation(mutation) => apply_mutation(mutation, env, vis),
    }
}

fn apply_mutation(
    mutation: &Mutation,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<(), ExecErrorKind> {
    if env.frozen {
        if mutation.writes_symbols() {
            return Err(ExecErrorKind::GrammarFrozen("symbols"));
        }
        if mutation.writes_productions() {
            return Err(ExecErrorKind::GrammarFrozen("productions"));
        }
    }
    if !env.simulating {
        if let Mutation::Push { queue, .. } | Mutation::Pop { queue, .. } = mutation {
            return Err(ExecErrorKind::QueueOutsideTest(*queue));
        }
    }
    check_bounds(mutation, env)?;

    match mutation {
        // ===== Grammar definition =====
        Mutation::AddSymbol {
            name,
            terminal,
            start,
        } => {
            env.symbols.push(Symbol {
                name: name.clone(),
                terminal: Some(*terminal),
                start: *start,
                ..Symbol::default()
            });
        }
        Mutation::SetSymbolName { symbol, name } => {
            env.symbols.get_mut(*symbol).name = name.clone();
        }
        Mutation::SetSymbolTerminal { symbol, terminal } => {
            env.symbols.get_mut(*symbol).terminal = Some(*terminal);
        }
        Mutation::SetSymbolStart { symbol, start } => {
            env.symbols.get_mut(*symbol).start = Some(*start);
        }
        Mutation::LinkProduction { symbol, production } => {
            env.symbols.get_mut(*symbol).productions.push(*production);
        }
        Mutation::AddProduction { head, body } => {
            let index = env.productions.push(Production::new(*head, body.clone()));
            env.symbols.get_mut(*head).productions.push(index);
        }
        Mutation::SetProductionHead { production, head } => {
            env.productions.get_mut(*production).head = Some(*head);
        }
        Mutation::SetProductionBody { production, body } => {
            env.productions.get_mut(*production).body = body.clone();
        }

        // ===== Attributes =====
        Mutation::SetNullable { symbol, nullable } => {
            env.symbols.get_mut(*symbol).nullable = Some(*nullable);
        }
        Mutation::AddFirst { symbol, member } => {
            check_set_member(env, *symbol, *member, "FIRST")?;
            env.symbols.get_mut(*symbol).first.insert(*member);
        }
        Mutation::AddFollow { symbol, member } => {
            check_set_member(env, *symbol, *member, "FOLLOW")?;
            env.symbols.get_mut(*symbol).follow.insert(*member);
        }
        Mutation::MergeFollow { dest, src } => {
            let source = env
                .symbols
                .peek(*src)
                .map(|s| s.follow.clone())
                .unwrap_or_default();
            env.symbols.get_mut(*dest).follow.extend(source);
        }

        // ===== Parse table =====
        Mutation::AddAction {
            state,
            symbol,
            action,
        } => {
            let cell = env.table.get_mut(*state).get_mut(*symbol);
            if cell.insert(*action) && cell.has_conflict() {
                log::debug!("conflict at [{}][{}]: {}", state, symbol, cell);
            }
        }

        // ===== Simulation queues =====
        Mutation::Push { queue, end, value } => {
            let deque = env.queue_mut(*queue);
            let op = match end {
                QueueEnd::Back => {
                    deque.push_back(*value);
                    QueueOp::PushBack
                }
                QueueEnd::Front => {
                    deque.push_front(*value);
                    QueueOp::PushFront
                }
            };
            vis.queue_changed(*queue, op, *value);
        }
        Mutation::Pop { queue, end } => {
            let deque = env.queue_mut(*queue);
            let (value, op) = match end {
                QueueEnd::Back => (deque.pop_back(), QueueOp::PopBack),
                QueueEnd::Front => (deque.pop_front(), QueueOp::PopFront),
            };
            let value = value.ok_or(ExecErrorKind::EmptyQueue(*queue))?;
            vis.queue_changed(*queue, op, value);
        }

        // ===== Visualization =====
        Mutation::Show(text) => {
            env.message = Some(text.clone());
            vis.show(text);
        }
        Mutation::AddState { state, description } => {
            let handle = vis.add_state(*state, description);
            env.automaton.states.set(
                *state,
                Some(StateNode {
                    description: description.clone(),
                    handle,
                    is_start: false,
                    is_final: false,
                }),
            );
        }
        Mutation::UpdateState { state, description } => {
            let node = env
                .automaton
                .state_mut(*state)
                .ok_or(ExecErrorKind::UnknownState(*state))?;
            node.description = description.clone();
            vis.update_state(node.handle, description);
        }
        Mutation::AddEdge { from, to, label } => {
            let from_handle = state_handle(env, *from)?;
            let to_handle = state_handle(env, *to)?;
            let handle = vis.add_edge(from_handle, to_handle, label);
            env.automaton.edges.push(Edge {
                from: *from,
                to: *to,
                label: label.clone(),
                handle,
            });
        }
        Mutation::SetStart(state) => {
            let node = env
                .automaton
                .state_mut(*state)
                .ok_or(ExecErrorKind::UnknownState(*state))?;
            node.is_start = true;
            vis.set_start(node.handle);
        }
        Mutation::SetFinal(state) => {
            let node = env
                .automaton
                .state_mut(*state)
                .ok_or(ExecErrorKind::UnknownState(*state))?;
            node.is_final = true;
            vis.set_final(node.handle);
        }
        Mutation::AstAddNode { node, label } => {
            env.forest.nodes.set(
                *node,
                Some(TreeNode {
                    label: label.clone(),
                    parent: None,
                }),
            );
            vis.ast_add_node(*node, label);
        }
        Mutation::AstSetParent { child, parent } => {
            if !env.forest.contains(*parent) {
                return Err(ExecErrorKind::UnknownNode(*parent));
            }
            if !env.forest.contains(*child) {
                return Err(ExecErrorKind::UnknownNode(*child));
            }
            if let Some(node) = env.forest.nodes.get_mut(*child) {
                node.parent = Some(*parent);
            }
            vis.ast_set_parent(*child, *parent);
        }
    }

    Ok(())
}

fn in_range(what: &'static str, index: usize, limit: usize) -> Result<(), ExecErrorKind> {
    if index < limit {
        Ok(())
    } else {
        Err(ExecErrorKind::IndexOutOfRange { what, index, limit })
    }
}

/// Reject indices past the env's limits before any container pads to them
fn check_bounds(mutation: &Mutation, env: &ParsingEnv) -> Result<(), ExecErrorKind> {
    let limits = env.limits;
    let symbol = |index| in_range("symbol", index, limits.symbols);
    let production = |index| in_range("production", index, limits.productions);
    let state = |index| in_range("state", index, limits.states);
    match mutation {
        Mutation::AddSymbol { .. } => symbol(env.symbols.len()),
        Mutation::SetSymbolName { symbol: s, .. }
        | Mutation::SetSymbolTerminal { symbol: s, .. }
        | Mutation::SetSymbolStart { symbol: s, .. }
        | Mutation::SetNullable { symbol: s, .. } => symbol(*s),
        Mutation::AddFirst { symbol: s, member } | Mutation::AddFollow { symbol: s, member } => {
            symbol(*s).and_then(|_| symbol(*member))
        }
        Mutation::MergeFollow { dest, src } => symbol(*dest).and_then(|_| symbol(*src)),
        Mutation::LinkProduction {
            symbol: s,
            production: p,
        } => symbol(*s).and_then(|_| production(*p)),
        Mutation::AddProduction { head, body } => {
            production(env.productions.len())?;
            symbol(*head)?;
            body.iter().try_for_each(|&member| symbol(member))
        }
        Mutation::SetProductionHead { production: p, head } => {
            production(*p).and_then(|_| symbol(*head))
        }
        Mutation::SetProductionBody { production: p, body } => {
            production(*p)?;
            body.iter().try_for_each(|&member| symbol(member))
        }
        Mutation::AddAction {
            state: st,
            symbol: s,
            action,
        } => {
            state(*st)?;
            symbol(*s)?;
            match action {
                Action::Shift(target) | Action::Goto(target) => state(*target),
                Action::Reduce(p) => production(*p),
                Action::Accept => Ok(()),
            }
        }
        Mutation::Push { queue, value, .. } => {
            if queue.holds_symbols() {
                symbol(*value)
            } else {
                state(*value)
            }
        }
        Mutation::AddState { state: st, .. } => state(*st),
        Mutation::AddEdge { from, to, .. } => state(*from).and_then(|_| state(*to)),
        Mutation::AstAddNode { node, .. } => in_range("node", *node, limits.nodes),
        Mutation::Pop { .. }
        | Mutation::Show(_)
        | Mutation::UpdateState { .. }
        | Mutation::SetStart(_)
        | Mutation::SetFinal(_)
        | Mutation::AstSetParent { .. } => Ok(()),
    }
}

fn state_handle(env: &ParsingEnv, state: usize) -> Result<usize, ExecErrorKind> {
    env.automaton
        .state(state)
        .map(|s| s.handle)
        .ok_or(ExecErrorKind::UnknownState(state))
}

/// FIRST/FOLLOW members must not be symbols known to be nonterminals
fn check_set_member(
    env: &ParsingEnv,
    symbol: usize,
    member: usize,
    set: &'static str,
) -> Result<(), ExecErrorKind> {
    match env.symbols.peek(member) {
        Some(s) if s.is_nonterminal() => Err(ExecErrorKind::NonterminalMember {
            symbol,
            member,
            set,
        }),
        _ => Ok(()),
    }
}

/// Apply commands from `cursor`, halting after the first section marker or
/// narration.
pub fn advance_one(
    script: &StepScript,
    cursor: usize,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<Stop, ScriptExecutionError> {
    for offset in cursor..script.len() {
        apply_at(script, offset, env, vis)?;
        if script
            .get(offset)
            .is_some_and(|l| l.command.is_halt_point())
        {
            return Ok(Stop::At(offset));
        }
    }
    Ok(Stop::End)
}

/// Skip mutations from `cursor`. The first section marker is applied and
/// halts; a narration halts without being applied.
pub fn advance_skipping(
    script: &StepScript,
    cursor: usize,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<Stop, ScriptExecutionError> {
    for offset in cursor..script.len() {
        let Some(line) = script.get(offset) else {
            break;
        };
        match &line.command {
            Command::Section(_) => {
                apply_at(script, offset, env, vis)?;
                return Ok(Stop::At(offset));
            }
            Command::Narration(_) => return Ok(Stop::At(offset)),
            Command::Mutation(_) | Command::Malformed(_) => {}
        }
    }
    Ok(Stop::End)
}

/// Apply everything from `cursor` up to and including the next section
/// marker.
pub fn advance_through_section(
    script: &StepScript,
    cursor: usize,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<Stop, ScriptExecutionError> {
    for offset in cursor..script.len() {
        apply_at(script, offset, env, vis)?;
        if script.get(offset).is_some_and(|l| l.command.is_section()) {
            return Ok(Stop::At(offset));
        }
    }
    Ok(Stop::End)
}

/// Apply only the next section marker, skipping everything before it.
pub fn skip_through_section(
    script: &StepScript,
    cursor: usize,
    env: &mut ParsingEnv,
    vis: &mut dyn Visualizer,
) -> Result<Stop, ScriptExecutionError> {
    match script.find_section_marker(cursor) {
        Some(offset) => {
            apply_at(script, offset, env, vis)?;
            Ok(Stop::At(offset))
        }
        None => Ok(Stop::End),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, QueueKind};
    use crate::replay::visualizer::{NullVisualizer, RecordingVisualizer, VisualEvent};

    fn script(lines: &[&str]) -> StepScript {
        StepScript::from_lines(lines.iter().copied())
    }

    #[test]
    fn test_advance_skipping_applies_only_the_marker() {
        let s = script(&["addSymbol('a', true)", "section('DFA')", "addSymbol('b', true)"]);
        let mut env = ParsingEnv::new();
        let mut vis = RecordingVisualizer::new();

        let stop = advance_skipping(&s, 0, &mut env, &mut vis).unwrap();

        assert_eq!(stop, Stop::At(1));
        assert!(env.symbols.is_empty());
        assert_eq!(env.section.as_deref(), Some("DFA"));
        assert_eq!(vis.events, vec![VisualEvent::Section("DFA".to_string())]);
    }

    #[test]
    fn test_advance_skipping_halts_before_narration() {
        let s = script(&["addSymbol('a', true)", "# hello", "#! DFA"]);
        let mut env = ParsingEnv::new();
        let stop = advance_skipping(&s, 0, &mut env, &mut NullVisualizer::default()).unwrap();
        assert_eq!(stop, Stop::At(1));
        assert_eq!(env.message, None);
        assert_eq!(env.section, None);
    }

    #[test]
    fn test_advance_one_halts_after_narration() {
        let s = script(&[
            "addSymbol('E', false)",
            "# Added E",
            "addSymbol('+', true)",
        ]);
        let mut env = ParsingEnv::new();
        let mut vis = NullVisualizer::default();

        let stop = advance_one(&s, 0, &mut env, &mut vis).unwrap();
        assert_eq!(stop, Stop::At(1));
        assert_eq!(env.symbols.len(), 1);
        assert_eq!(env.message.as_deref(), Some("Added E"));

        let stop = advance_one(&s, stop.next_cursor(s.len()), &mut env, &mut vis).unwrap();
        assert_eq!(stop, Stop::End);
        assert_eq!(env.symbols.len(), 2);
        assert_eq!(stop.next_cursor(s.len()), 3);
    }

    #[test]
    fn test_advance_through_section_ignores_narration() {
        let s = script(&["# one", "symbol[0].nullable = True", "# two", "#! DFA", "# three"]);
        let mut env = ParsingEnv::new();
        let stop =
            advance_through_section(&s, 0, &mut env, &mut NullVisualizer::default()).unwrap();
        assert_eq!(stop, Stop::At(3));
        assert_eq!(env.symbols.get(0).nullable, Some(true));
        assert_eq!(env.message.as_deref(), Some("two"));
    }

    #[test]
    fn test_skip_through_section_never_applies_malformed() {
        let s = script(&["definitely not a command", "# note", "#! Test", "more junk"]);
        let mut env = ParsingEnv::new();
        let stop = skip_through_section(&s, 0, &mut env, &mut NullVisualizer::default()).unwrap();
        assert_eq!(stop, Stop::At(2));
        assert_eq!(env.section.as_deref(), Some("Test"));
        assert_eq!(env.message, None);

        let stop = skip_through_section(&s, 3, &mut env, &mut NullVisualizer::default()).unwrap();
        assert_eq!(stop, Stop::End);
    }

    #[test]
    fn test_malformed_command_fails_with_offset() {
        let s = script(&["addSymbol('E', false)", "symbol[0].colour = 'red'"]);
        let mut env = ParsingEnv::new();
        let err = advance_through_section(&s, 0, &mut env, &mut NullVisualizer::default())
            .unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.line, 2);
        assert_eq!(err.command, "symbol[0].colour = 'red'");
        assert!(matches!(err.kind, ExecErrorKind::Malformed(_)));
    }

    #[test]
    fn test_grammar_frozen_after_parse_table() {
        let s = script(&["addSymbol('E', false)", "#! Parse Table", "addSymbol('F', false)"]);
        let mut env = ParsingEnv::new();
        let err = advance_through_section(&s, 0, &mut env, &mut NullVisualizer::default())
            .and_then(|stop| {
                advance_through_section(
                    &s,
                    stop.next_cursor(s.len()),
                    &mut env,
                    &mut NullVisualizer::default(),
                )
            })
            .unwrap_err();
        assert_eq!(err.kind, ExecErrorKind::GrammarFrozen("symbols"));
        assert_eq!(env.symbols.len(), 1);
    }

    #[test]
    fn test_add_production_links_head() {
        let mut env = ParsingEnv::new();
        let mut vis = NullVisualizer::default();
        for line in ["addSymbol('E', false)", "addProduction(0, [0, 1, 0])", "addProduction(0, [])"] {
            apply(&Command::parse(line), &mut env, &mut vis).unwrap();
        }
        assert_eq!(env.symbols.get(0).productions, vec![0, 1]);
        assert_eq!(env.productions.get(1).body, Vec::<usize>::new());
        // Body symbols need not exist yet
        assert_eq!(env.symbols.len(), 1);
    }

    #[test]
    fn test_state_handles_flow_back_to_visualizer() {
        let s = script(&[
            "addState(0, 'I0')",
            "addState(1, 'I1')",
            "addEdge(0, 1, 'E')",
            "setStart(0)",
            "updateState(1, 'I1*')",
        ]);
        let mut env = ParsingEnv::new();
        let mut vis = RecordingVisualizer::with_handle_base(100);
        advance_through_section(&s, 0, &mut env, &mut vis).unwrap();

        assert_eq!(
            vis.events[2..],
            [
                VisualEvent::AddEdge(100, 101, "E".to_string()),
                VisualEvent::SetStart(100),
                VisualEvent::UpdateState(101, "I1*".to_string()),
            ]
        );
        assert_eq!(env.automaton.edges[0].from, 0);
        assert_eq!(env.automaton.state(1).map(|s| s.handle), Some(101));
    }

    #[test]
    fn test_out_of_range_constructs() {
        let cases = [
            ("addEdge(0, 1, 'a')", ExecErrorKind::UnknownState(0)),
            ("setFinal(4)", ExecErrorKind::UnknownState(4)),
            ("state_stack.pop()", ExecErrorKind::EmptyQueue(QueueKind::StateStack)),
            ("astSetParent(0, 1)", ExecErrorKind::UnknownNode(1)),
        ];
        for (line, expected) in cases {
            let mut env = ParsingEnv::new();
            env.enter_section("Test");
            let err = apply(&Command::parse(line), &mut env, &mut NullVisualizer::default())
                .unwrap_err();
            assert_eq!(err, expected, "{}", line);
        }
    }

    #[test]
    fn test_first_set_rejects_nonterminal_member() {
        let mut env = ParsingEnv::new();
        let mut vis = NullVisualizer::default();
        apply(&Command::parse("addSymbol('E', false)"), &mut env, &mut vis).unwrap();
        apply(&Command::parse("addSymbol('id', true)"), &mut env, &mut vis).unwrap();

        apply(&Command::parse("symbol[0].first.add(1)"), &mut env, &mut vis).unwrap();
        let err = apply(&Command::parse("symbol[0].first.add(0)"), &mut env, &mut vis)
            .unwrap_err();
        assert!(matches!(err, ExecErrorKind::NonterminalMember { member: 0, .. }));

        // Not yet defined: accepted, the tool may add the symbol later
        apply(&Command::parse("symbol[0].follow.add(5)"), &mut env, &mut vis).unwrap();
        apply(&Command::parse("symbol[1].follow.update(symbol[0].follow)"), &mut env, &mut vis)
            .unwrap();
        assert!(env.symbols.get(1).follow.contains(&5));
    }

    #[test]
    fn test_queue_notifications_carry_values() {
        let s = script(&[
            "#! Test",
            "input_queue.append(3)",
            "input_queue.append(1)",
            "symbol_stack.append(3)",
            "input_queue.popleft()",
            "state_stack.appendleft(0)",
        ]);
        let mut env = ParsingEnv::new();
        let mut vis = RecordingVisualizer::new();
        let stop = advance_through_section(&s, 0, &mut env, &mut vis).unwrap();
        advance_through_section(&s, stop.next_cursor(s.len()), &mut env, &mut vis).unwrap();

        assert_eq!(
            vis.events[4],
            VisualEvent::Queue(QueueKind::InputQueue, QueueOp::PopFront, 3)
        );
        assert_eq!(env.input_queue, [1]);
        assert_eq!(env.state_stack, [0]);
    }

    #[test]
    fn test_conflicting_actions_are_kept() {
        let s = script(&["table[3][1].add('s4')", "table[3][1].add('r2')", "table[3][2].add('acc')"]);
        let mut env = ParsingEnv::new();
        advance_through_section(&s, 0, &mut env, &mut NullVisualizer::default()).unwrap();
        assert!(env.table.get_mut(3).get(1).has_conflict());
        assert!(!env.table.get_mut(3).get(2).has_conflict());
        assert!(env.table.get_mut(3).get(2).contains(&Action::Accept));
    }

    #[test]
    fn test_attributes_frozen_after_parse_table() {
        for line in [
            "symbol[9].nullable = True",
            "symbol[0].first.add(1)",
            "symbol[0].follow.add(1)",
            "symbol[0].follow.update(symbol[0].follow)",
            "symbol[0].productions.append(0)",
        ] {
            let mut env = ParsingEnv::new();
            let mut vis = NullVisualizer::default();
            apply(&Command::parse("addSymbol('E', false)"), &mut env, &mut vis).unwrap();
            apply(&Command::parse("#! Parse Table"), &mut env, &mut vis).unwrap();

            let err = apply(&Command::parse(line), &mut env, &mut vis).unwrap_err();
            assert_eq!(err, ExecErrorKind::GrammarFrozen("symbols"), "{}", line);
            assert_eq!(env.symbols.len(), 1);
        }

        let mut env = ParsingEnv::new();
        env.enter_section("Parse Table");
        let err = apply(
            &Command::parse("production[0].body = [1]"),
            &mut env,
            &mut NullVisualizer::default(),
        )
        .unwrap_err();
        assert_eq!(err, ExecErrorKind::GrammarFrozen("productions"));
    }

    #[test]
    fn test_queues_rejected_before_test_section() {
        let s = script(&[
            "addSymbol('E', false)",
            "#! Parse Table",
            "symbol_stack.append(0)",
        ]);
        let mut env = ParsingEnv::new();
        let mut vis = NullVisualizer::default();
        let stop = advance_through_section(&s, 0, &mut env, &mut vis).unwrap();
        let err = advance_through_section(&s, stop.next_cursor(s.len()), &mut env, &mut vis)
            .unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.kind, ExecErrorKind::QueueOutsideTest(QueueKind::SymbolStack));
        assert!(env.symbol_stack.is_empty());

        let err = apply(&Command::parse("input_queue.popleft()"), &mut env, &mut vis)
            .unwrap_err();
        assert_eq!(err, ExecErrorKind::QueueOutsideTest(QueueKind::InputQueue));

        // Seeding between the two test markers is allowed
        apply(&Command::parse("#! Test"), &mut env, &mut vis).unwrap();
        apply(&Command::parse("state_stack.append(0)"), &mut env, &mut vis).unwrap();
        assert_eq!(env.state_stack, [0]);
    }

    #[test]
    fn test_indices_past_the_limit_fail() {
        let cases = [
            ("symbol[9223372036854775807].name = 'x'", "symbol"),
            ("table[0][4000000000000].add('s1')", "symbol"),
            ("table[70000][0].add('s1')", "state"),
            ("table[0][0].add('r70000')", "production"),
            ("addState(70000, 'I')", "state"),
            ("astAddNode(70000, 'E')", "node"),
            ("addProduction(0, [1, 70000])", "symbol"),
        ];
        for (line, what) in cases {
            let mut env = ParsingEnv::new();
            let err = apply(&Command::parse(line), &mut env, &mut NullVisualizer::default())
                .unwrap_err();
            assert!(
                matches!(err, ExecErrorKind::IndexOutOfRange { what: w, .. } if w == what),
                "{} gave {:?}",
                line,
                err
            );
            assert_eq!(env, ParsingEnv::new(), "{}", line);
        }
    }

    #[test]
    fn test_header_counts_bound_indices() {
        let s = script(&[
            "addSymbol('S', false)",
            "addSymbol('a', true)",
            "addSymbol('b', true)",
            "symbol[1].nullable = False",
        ]);
        let mut env = ParsingEnv::with_capacity(2, 1);
        let err = advance_through_section(&s, 0, &mut env, &mut NullVisualizer::default())
            .unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(
            err.kind,
            ExecErrorKind::IndexOutOfRange {
                what: "symbol",
                index: 2,
                limit: 2
            }
        );

        let mut vis = NullVisualizer::default();
        apply(&Command::parse("addProduction(0, [1])"), &mut env, &mut vis).unwrap();
        let err = apply(&Command::parse("production[1].head = 0"), &mut env, &mut vis)
            .unwrap_err();
        assert!(matches!(err, ExecErrorKind::IndexOutOfRange { what: "production", .. }));
    }
}

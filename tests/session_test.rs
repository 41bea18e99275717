// Integration tests for phase-by-phase replay

use lrstep::model::{table, QueueKind};
use lrstep::replay::{self, NullVisualizer, RecordingVisualizer, VisualEvent};
use lrstep::script::{Command, StepScript};
use lrstep::session::{Phase, PhaseState, SessionController, SessionError, ValidationError};
use lrstep::tool::{
    AnalysisRequest, AnalysisTool, GrammarSource, ParserMode, ToolInvocationError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Steps for the grammar `S -> a`: symbols S, a, $
const GRAMMAR_STEPS: &str = r#"#!nsym=3,nprod=1
from lrparser import *

addSymbol('S', false, true)
addSymbol('a', true)
addSymbol('$', true)
addProduction(0, [1])
#! Attributes
# S is not nullable
symbol[0].nullable = False
symbol[0].first.add(1)
# FOLLOW(S) holds the end marker
symbol[0].follow.add(2)
#! DFA
addState(0, 'S -> . a')
setStart(0)
# goto on a
addState(1, 'S -> a .')
addEdge(0, 1, 'a')
setFinal(1)
#! Parse Table
table[0][1].add('s1')
# reduce on the end marker
table[1][2].add('r0')
"#;

/// Shift-reduce run on the input `a $`
const TEST_STEPS: &str = r#"#! Test
state_stack.append(0)
input_queue.append(1)
input_queue.append(2)
#! Init Test
# shift a
input_queue.popleft()
symbol_stack.append(1)
state_stack.append(1)
astAddNode(0, 'a')
# reduce by S -> a
symbol_stack.pop()
state_stack.pop()
symbol_stack.append(0)
astAddNode(1, 'S')
astSetParent(0, 1)
# accept
"#;

fn steps_for(request: &AnalysisRequest) -> StepScript {
    let mut text = GRAMMAR_STEPS.to_string();
    if request.input.is_some() {
        text.push_str(TEST_STEPS);
    }
    StepScript::parse(&text)
}

fn fake_tool(calls: Arc<AtomicUsize>) -> Arc<dyn AnalysisTool> {
    Arc::new(
        move |request: &AnalysisRequest| -> Result<StepScript, ToolInvocationError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(steps_for(request))
        },
    )
}

fn request() -> AnalysisRequest {
    AnalysisRequest::new(GrammarSource::Text("S -> a".to_string()), ParserMode::Lalr)
}

/// Drive Grammar through `last`, finishing every phase on the way
fn run_through(last: Phase, tool: Arc<dyn AnalysisTool>) -> SessionController {
    let mut vis = NullVisualizer::default();
    let mut controller = SessionController::new(Phase::Grammar, tool, Duration::from_secs(5));
    controller.start(request(), &mut vis).expect("start failed");
    loop {
        controller.finish(&mut vis).expect("finish failed");
        if controller.phase() == last {
            return controller;
        }
        let script = controller.script().cloned().expect("no script");
        let mut next = controller.next_phase().expect("next phase failed");
        next.load_script(script, &mut vis).expect("load failed");
        controller = next;
    }
}

#[test]
fn test_every_phase_in_order() {
    let controller = run_through(Phase::Test, fake_tool(Arc::default()));
    assert_eq!(controller.phase(), Phase::Test);
    assert!(controller.is_complete());

    let env = controller.env().expect("env");
    assert_eq!(env.symbols.len(), 3);
    assert_eq!(env.productions.len(), 1);
    assert_eq!(env.symbols.peek(0).and_then(|s| s.nullable), Some(false));
    assert!(env.symbols.peek(0).is_some_and(|s| s.follow.contains(&2)));
    assert_eq!(env.automaton.state_count(), 2);
    assert!(table::conflicts(&env.table).is_empty());
    // No input was given, so nothing was simulated
    assert!(env.forest.outline().is_empty());
}

#[test]
fn test_narrated_attributes_scenario() {
    let script = StepScript::from_lines([
        "addSymbol('E', false)",
        "addSymbol('+', true)",
        "addProduction(0, [0, 1, 0])",
        "section('Attributes')",
        "# Done",
    ]);
    let mut controller = SessionController::new(
        Phase::Attributes,
        fake_tool(Arc::default()),
        Duration::from_secs(1),
    );
    let mut vis = NullVisualizer::default();
    controller.load_script(script, &mut vis).unwrap();
    for _ in 0..4 {
        controller.step(&mut vis).unwrap();
    }
    assert_eq!(controller.finish(&mut vis).unwrap(), PhaseState::PhaseComplete);

    let env = controller.env().unwrap();
    let e = env.symbols.peek(0).unwrap();
    assert_eq!((e.name.as_str(), e.is_nonterminal()), ("E", true));
    let plus = env.symbols.peek(1).unwrap();
    assert_eq!((plus.name.as_str(), plus.is_terminal()), ("+", true));
    assert_eq!(
        env.productions.peek(0).map(|p| p.render(&env.symbols)),
        Some("E → E + E".to_string())
    );
    assert_eq!(env.section.as_deref(), Some("Attributes"));
    assert_eq!(env.message.as_deref(), Some("Done"));
    assert_eq!(controller.cursor(), 5);
}

#[test]
fn test_finish_matches_stepping() {
    let tool = fake_tool(Arc::default());
    let script = steps_for(&request());

    let mut finished =
        SessionController::new(Phase::Automaton, Arc::clone(&tool), Duration::from_secs(1));
    let mut stepped = SessionController::new(Phase::Automaton, tool, Duration::from_secs(1));
    let mut finish_vis = RecordingVisualizer::new();
    let mut step_vis = RecordingVisualizer::new();

    finished.load_script(script.clone(), &mut finish_vis).unwrap();
    stepped.load_script(script, &mut step_vis).unwrap();

    finished.finish(&mut finish_vis).unwrap();
    let mut steps = 0;
    while stepped.step(&mut step_vis).unwrap() == PhaseState::Running {
        steps += 1;
    }

    assert!(steps > 0);
    assert_eq!(finished.cursor(), stepped.cursor());
    assert_eq!(finished.env(), stepped.env());
    assert_eq!(finish_vis.events, step_vis.events);
}

#[test]
fn test_forked_env_is_independent() {
    let mut attributes = run_through(Phase::Attributes, fake_tool(Arc::default()));
    let mut fork = attributes.fork().unwrap();

    replay::apply(
        &Command::parse("symbol[1].name = 'b'"),
        &mut fork,
        &mut NullVisualizer::default(),
    )
    .unwrap();

    let original = attributes.env().unwrap();
    assert_eq!(original.symbols.peek(1).map(|s| s.name.as_str()), Some("a"));
    assert_eq!(fork.symbols.peek(1).map(|s| s.name.as_str()), Some("b"));

    // The finished phase stays put
    assert_eq!(
        attributes.step(&mut NullVisualizer::default()).unwrap(),
        PhaseState::PhaseComplete
    );
}

#[test]
fn test_conflicting_actions_are_reported() {
    let script = StepScript::from_lines([
        "addSymbol('S', false, true)",
        "addSymbol('a', true)",
        "#! Parse Table",
        "table[0][1].add('s1')",
        "# both a shift and a reduce",
        "table[0][1].add('r0')",
    ]);
    let mut controller = SessionController::new(
        Phase::ParseTable,
        fake_tool(Arc::default()),
        Duration::from_secs(1),
    );
    let mut vis = NullVisualizer::default();
    controller.load_script(script, &mut vis).unwrap();
    controller.finish(&mut vis).unwrap();

    let env = controller.env().unwrap();
    assert_eq!(table::conflicts(&env.table), vec![(0, 1)]);
    let cell = env.table.peek(0).and_then(|row| row.peek(1)).unwrap();
    let lines = cell.explain(&env.symbols, &env.productions);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines.last().map(String::as_str), Some("[Conflicts]"));
}

#[test]
fn test_reset_runs_simulation() {
    let mut controller = run_through(Phase::Test, fake_tool(Arc::default()));
    let mut vis = RecordingVisualizer::new();

    let state = controller.reset("a", &mut vis).unwrap();
    assert_eq!(state, PhaseState::Running);
    assert_eq!(
        controller.request().and_then(|r| r.input_line()),
        Some("a $".to_string())
    );
    {
        // Seeded by the setup section, nothing simulated yet
        let env = controller.env().unwrap();
        assert_eq!(env.render_queue(QueueKind::InputQueue), vec!["a", "$"]);
        assert_eq!(env.render_queue(QueueKind::StateStack), vec!["0"]);
        assert!(env.symbol_stack.is_empty());
    }

    assert_eq!(controller.step(&mut vis).unwrap(), PhaseState::Running);
    assert_eq!(
        controller.env().and_then(|e| e.message.as_deref()),
        Some("shift a")
    );

    assert_eq!(controller.finish(&mut vis).unwrap(), PhaseState::PhaseComplete);
    let env = controller.env().unwrap();
    assert_eq!(env.render_queue(QueueKind::SymbolStack), vec!["S"]);
    assert_eq!(env.render_queue(QueueKind::InputQueue), vec!["$"]);
    assert_eq!(env.forest.outline(), vec!["S", "  a"]);
    assert!(vis.events.contains(&VisualEvent::AstSetParent(0, 1)));

    // A second reset starts the simulation over on the kept grammar
    controller.reset("a", &mut vis).unwrap();
    let env = controller.env().unwrap();
    assert!(env.forest.outline().is_empty());
    assert_eq!(env.automaton.state_count(), 2);
    assert_eq!(env.symbols.len(), 3);
}

#[test]
fn test_rejected_input_never_reaches_tool() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = run_through(Phase::Test, fake_tool(Arc::clone(&calls)));
    let before = calls.load(Ordering::SeqCst);
    let mut vis = NullVisualizer::default();

    let err = controller.reset("a b", &mut vis).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::UnknownSymbol(ref name)) if name == "b"
    ));
    let err = controller.reset("S", &mut vis).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::NotTerminal(_))
    ));
    let err = controller.reset("a $ a", &mut vis).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::MisplacedEndMarker)
    ));

    assert_eq!(calls.load(Ordering::SeqCst), before);
    assert!(controller.is_complete());
    assert!(controller.env().is_some());
}

#[test]
fn test_tool_timeout_leaves_controller_idle() {
    let slow: Arc<dyn AnalysisTool> = Arc::new(
        |request: &AnalysisRequest| -> Result<StepScript, ToolInvocationError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(steps_for(request))
        },
    );
    let mut controller = SessionController::new(Phase::Grammar, slow, Duration::from_millis(50));

    let err = controller
        .start(request(), &mut NullVisualizer::default())
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Tool(ToolInvocationError::TimedOut(_))
    ));
    assert_eq!(controller.state(), PhaseState::Idle);
    assert!(controller.env().is_none());
}

#[test]
fn test_headless_transcript() {
    let controller = SessionController::new(
        Phase::Grammar,
        fake_tool(Arc::default()),
        Duration::from_secs(5),
    );
    let out = lrstep::headless::run(controller, request(), Some("a"), Vec::new()).unwrap();
    let text = String::from_utf8(out).unwrap();

    for expected in [
        "== Attributes ==",
        "  S is not nullable",
        "== Parse Table ==",
        "-- test input: a --",
        "  accept",
        "== Summary ==",
        "  (0) S → a",
        "  2 states, 1 edges",
        "  no conflicts",
        "    S",
        "      a",
    ] {
        assert!(text.contains(expected), "missing {:?} in\n{}", expected, text);
    }
    assert!(text.find("== DFA ==") < text.find("== Parse Table =="));
}

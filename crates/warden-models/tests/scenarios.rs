//! Full checker runs over the bundled models.

use warden_mc::{CheckConfig, CheckOutcome, Checker, Model};
use warden_models::{JugState, ReplState};

fn run<M: Model>(initial: M) -> (Checker<M>, CheckOutcome<M>) {
    let mut checker = Checker::new(CheckConfig::default());
    let outcome = checker.run(vec![initial]).expect("engine error");
    (checker, outcome)
}

#[test]
fn jug_puzzle_measures_four_in_six_steps() {
    let (_, outcome) = run(JugState::<4>::empty());
    match outcome {
        CheckOutcome::InvariantViolation { trace } => {
            // The classic solution: six transitions, seven states.
            assert_eq!(trace.len(), 7);
            assert_eq!(trace[0], JugState::empty());
            let last = trace.last().unwrap();
            assert_eq!(last.big, 4);
            for state in &trace[..trace.len() - 1] {
                assert!(state.satisfy_invariant());
            }
        }
        other => panic!("expected a violation, got {other:?}"),
    }
}

#[test]
fn jug_puzzle_full_space_has_sixteen_states() {
    // A forbidden amount the big jug can never hold: the invariant is
    // vacuous and the run exhausts the space. Every reachable state has a
    // jug that is full or empty (each move ends that way), which gives
    // 16 reachable configurations.
    let (checker, outcome) = run(JugState::<6>::empty());
    match outcome {
        CheckOutcome::Ok {
            states_explored, ..
        } => assert_eq!(states_explored, 16),
        other => panic!("expected clean completion, got {other:?}"),
    }
    let snap = checker.stats().snapshot();
    assert_eq!(snap.unique, 16);
    assert_eq!(snap.seen_size, 16);
    assert!(snap.generated > snap.unique);
}

#[test]
fn repl_commit_term_check_verifies_clean() {
    let (checker, outcome) = run(ReplState::<true>::initial());
    match outcome {
        CheckOutcome::Ok {
            states_explored, ..
        } => {
            assert!(states_explored > 1_000, "suspiciously small space: {states_explored}");
        }
        other => panic!("expected clean completion, got {other:?}"),
    }
    let snap = checker.stats().snapshot();
    assert_eq!(snap.unique as usize, checker.store().len());
}

#[test]
fn repl_without_term_check_rolls_back_a_committed_write() {
    let (_, outcome) = run(ReplState::<false>::initial());
    match outcome {
        CheckOutcome::InvariantViolation { trace } => {
            assert!(trace.len() >= 4, "anomaly needs several steps, trace: {}", trace.len());
            assert_eq!(trace[0], ReplState::<false>::initial());
            let last = trace.last().unwrap();
            assert!(!last.satisfy_invariant());
            for state in &trace[..trace.len() - 1] {
                assert!(state.satisfy_invariant());
            }
            // Constraint held along the whole path: the violation is inside
            // the bounded space, not an artifact of its edge.
            for state in &trace {
                assert!(state.term <= 4);
                assert!(state.logs.iter().all(|log| log.len() <= 3));
            }
        }
        other => panic!("expected a violation, got {other:?}"),
    }
}

#[test]
fn repl_runs_are_deterministic() {
    // A truncated run is enough: identical prefixes imply identical counts.
    let bounded = CheckConfig {
        max_states: 20_000,
        ..CheckConfig::default()
    };
    let mut c1 = Checker::new(bounded.clone());
    c1.run(vec![ReplState::<true>::initial()]).expect("engine error");
    let mut c2 = Checker::new(bounded);
    c2.run(vec![ReplState::<true>::initial()]).expect("engine error");
    assert_eq!(c1.stats().snapshot(), c2.stats().snapshot());
}

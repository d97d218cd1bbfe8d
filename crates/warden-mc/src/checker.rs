//! Breadth-first state exploration with invariant checking.
//!
//! The algorithm:
//!
//! ```text
//! seen = {}; frontier = []
//! for each s in initial states: admit(s)
//! while frontier not empty:
//!     pop cur
//!     work = copy of cur
//!     work.generate(emitter)        // each either() branch calls admit()
//! admit(s):
//!     count generated; insert into seen (stop if duplicate); count unique
//!     if invariant fails: unwind with the trace to s
//!     if constraint fails: keep in seen, do not enqueue
//!     push s onto frontier
//! ```
//!
//! Admission checks the invariant *after* the seen-set insert, so the
//! violating state is present when its trace is reconstructed, and a state
//! that passed the invariant once is never re-evaluated.

use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, trace};

use crate::emitter::Emitter;
use crate::fingerprint::Fingerprint;
use crate::model::Model;
use crate::progress::Stats;
use crate::store::StateStore;

/// Model checking error.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Raised by admission when a state fails its invariant. This is the
    /// non-local unwind from deep inside `generate` back to the
    /// exploration loop, which converts it into
    /// [`CheckOutcome::InvariantViolation`]; it is the checker's intended
    /// finding, not a program error.
    #[error("invariant violated by state {fp}")]
    InvariantViolation { fp: Fingerprint },

    /// A predecessor chain points at a fingerprint the seen set does not
    /// hold. This is an engine defect, not a model finding.
    #[error("trace reconstruction failed: predecessor {missing} not in seen set")]
    BrokenTrace { missing: Fingerprint },
}

pub type CheckResult<T> = Result<T, CheckError>;

/// Result of model checking.
#[derive(Debug)]
pub enum CheckOutcome<M> {
    /// All reachable states explored, no violation found.
    Ok {
        states_explored: usize,
        max_depth: usize,
    },
    /// Invariant violation found. `trace` runs from an initial state to
    /// the violating state in discovery order and is shortest by number of
    /// transitions (ties broken by emission order).
    InvariantViolation { trace: Vec<M> },
    /// Exploration stopped at the configured state limit.
    StateLimitReached {
        states_explored: usize,
        max_depth: usize,
    },
}

/// Configuration for the model checker.
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Maximum number of states to admit before stopping (0 = unlimited).
    pub max_states: usize,
    /// Depth at which states are no longer expanded (0 = unlimited).
    pub max_depth: usize,
}

/// BFS queue entry: (fingerprint, state, depth).
type QueueEntry<M> = (Fingerprint, M, usize);

/// Explicit-state model checker.
///
/// Owns the seen set, the FIFO frontier and the run statistics for the
/// duration of one [`run`](Checker::run); both stay inspectable afterwards
/// through [`store`](Checker::store) and [`stats`](Checker::stats).
pub struct Checker<M: Model> {
    store: StateStore<M>,
    frontier: VecDeque<QueueEntry<M>>,
    stats: Arc<Stats>,
    config: CheckConfig,
}

impl<M: Model> Checker<M> {
    pub fn new(config: CheckConfig) -> Self {
        Self {
            store: StateStore::new(),
            frontier: VecDeque::new(),
            stats: Arc::new(Stats::new()),
            config,
        }
    }

    /// The seen set. Useful after a run for counting and inspection.
    pub fn store(&self) -> &StateStore<M> {
        &self.store
    }

    /// Shared handle to the run counters, for concurrent observers.
    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    /// Explore every state reachable from `initial_states`.
    ///
    /// Initial states are admitted in order before the loop starts, exactly
    /// as if emitted, with no predecessor. Returns `Err` only for internal
    /// consistency failures; a violation is a regular outcome.
    pub fn run(&mut self, initial_states: Vec<M>) -> CheckResult<CheckOutcome<M>> {
        info!(initial = initial_states.len(), "starting model checking");

        for state in &initial_states {
            if let Err(e) = self.admit(state, None, 0) {
                return self.conclude_violation(e);
            }
        }

        let mut max_depth = 0usize;
        let mut hit_state_limit = false;

        while let Some((fp, state, depth)) = self.frontier.pop_front() {
            trace!(depth, fp = %fp, "expanding state");
            max_depth = max_depth.max(depth);

            if self.config.max_depth > 0 && depth >= self.config.max_depth {
                continue;
            }
            if self.config.max_states > 0 && self.store.len() >= self.config.max_states {
                info!(states = self.store.len(), "reached state limit");
                hit_state_limit = true;
                break;
            }

            // Expand on a working copy; every either() branch snapshots and
            // restores it, so residual mutation never escapes this iteration.
            let mut work = state;
            let result = {
                let mut emit = Emitter::new(&mut *self, fp, depth);
                work.generate(&mut emit)
            };
            if let Err(e) = result {
                return self.conclude_violation(e);
            }
        }

        info!(
            states = self.store.len(),
            max_depth, "model checking complete"
        );

        if hit_state_limit {
            return Ok(CheckOutcome::StateLimitReached {
                states_explored: self.store.len(),
                max_depth,
            });
        }
        Ok(CheckOutcome::Ok {
            states_explored: self.store.len(),
            max_depth,
        })
    }

    /// Admit one candidate state: the target of every emission and of the
    /// initial-state loop.
    pub(crate) fn admit(
        &mut self,
        state: &M,
        predecessor: Option<Fingerprint>,
        depth: usize,
    ) -> CheckResult<()> {
        self.stats.generated.fetch_add(1, Ordering::Relaxed);

        let fp = Fingerprint::of(state);
        if !self.store.insert(fp, state.clone(), predecessor, depth) {
            return Ok(());
        }
        self.stats.unique.fetch_add(1, Ordering::Relaxed);
        self.stats
            .seen_size
            .store(self.store.len() as u64, Ordering::Relaxed);

        if !state.satisfy_invariant() {
            return Err(CheckError::InvariantViolation { fp });
        }
        if !state.satisfy_constraint() {
            return Ok(());
        }
        self.frontier.push_back((fp, state.clone(), depth));
        Ok(())
    }

    /// Turn the violation unwind into an outcome carrying the trace. Any
    /// other error is a real engine failure and passes through.
    fn conclude_violation(&self, err: CheckError) -> CheckResult<CheckOutcome<M>> {
        match err {
            CheckError::InvariantViolation { fp } => {
                let trace = self.store.trace_to(fp)?;
                info!(trace_len = trace.len(), "invariant violation found");
                Ok(CheckOutcome::InvariantViolation { trace })
            }
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    /// Counts up by one; invariant fails at 3.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Count(u8);

    impl fmt::Display for Count {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "count: {}", self.0)
        }
    }

    impl Model for Count {
        fn satisfy_invariant(&self) -> bool {
            self.0 != 3
        }

        fn generate(&mut self, emit: &mut Emitter<'_, Self>) -> CheckResult<()> {
            if self.0 < 10 {
                emit.either(self, |s, _| {
                    s.0 += 1;
                    Ok(())
                })?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_violation_trace_in_discovery_order() {
        let mut checker = Checker::new(CheckConfig::default());
        let outcome = checker.run(vec![Count(0)]).unwrap();
        match outcome {
            CheckOutcome::InvariantViolation { trace } => {
                assert_eq!(trace, vec![Count(0), Count(1), Count(2), Count(3)]);
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn test_violating_state_is_in_seen_set() {
        let mut checker = Checker::new(CheckConfig::default());
        checker.run(vec![Count(0)]).unwrap();
        assert!(checker.store().contains(Fingerprint::of(&Count(3))));
        assert_eq!(checker.stats().snapshot().unique, 4);
    }

    #[test]
    fn test_violating_initial_state() {
        let mut checker = Checker::new(CheckConfig::default());
        let outcome = checker.run(vec![Count(3)]).unwrap();
        match outcome {
            CheckOutcome::InvariantViolation { trace } => assert_eq!(trace, vec![Count(3)]),
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn test_state_limit() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        struct Free(u32);
        impl fmt::Display for Free {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        impl Model for Free {
            fn satisfy_invariant(&self) -> bool {
                true
            }
            fn generate(&mut self, emit: &mut Emitter<'_, Self>) -> CheckResult<()> {
                emit.either(self, |s, _| {
                    s.0 += 1;
                    Ok(())
                })
            }
        }

        let mut checker = Checker::new(CheckConfig {
            max_states: 5,
            ..CheckConfig::default()
        });
        match checker.run(vec![Free(0)]).unwrap() {
            CheckOutcome::StateLimitReached {
                states_explored, ..
            } => assert!(states_explored >= 5),
            other => panic!("expected state limit, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit_stops_expansion() {
        let mut checker = Checker::new(CheckConfig {
            max_depth: 2,
            ..CheckConfig::default()
        });
        // Depth 2 states are admitted but not expanded, so 3 is never reached.
        match checker.run(vec![Count(0)]).unwrap() {
            CheckOutcome::Ok {
                states_explored, ..
            } => assert_eq!(states_explored, 3),
            other => panic!("expected clean completion, got {other:?}"),
        }
    }
}

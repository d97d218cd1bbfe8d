//! Successor emission: the branch-point callback handed to `generate`.

use crate::checker::{Checker, CheckResult};
use crate::fingerprint::Fingerprint;
use crate::model::Model;

/// Presents candidate successor states to the engine from inside
/// [`Model::generate`](crate::Model::generate).
///
/// Each non-deterministic branch of the successor relation is one
/// [`either`](Emitter::either) call: the emitter snapshots the working
/// state, lets the branch body mutate it, hands the result to the engine,
/// and rolls the mutation back so the next branch starts from the same
/// pre-state.
pub struct Emitter<'a, M: Model> {
    checker: &'a mut Checker<M>,
    parent: Fingerprint,
    depth: usize,
}

impl<'a, M: Model> Emitter<'a, M> {
    pub(crate) fn new(checker: &'a mut Checker<M>, parent: Fingerprint, depth: usize) -> Self {
        Self {
            checker,
            parent,
            depth,
        }
    }

    /// Try one branch of the successor relation.
    ///
    /// The branch body receives the working state and the emitter itself,
    /// so branches may nest; each level snapshots and restores its own
    /// pre-state. A guard that decides a branch is disabled should simply
    /// not call `either`: nothing is emitted for that alternative.
    ///
    /// An invariant violation raised while admitting any emitted state
    /// propagates out as an error; forward it with `?`. No snapshot is
    /// restored on that path: the run is about to terminate.
    pub fn either<F>(&mut self, state: &mut M, branch: F) -> CheckResult<()>
    where
        F: FnOnce(&mut M, &mut Emitter<'a, M>) -> CheckResult<()>,
    {
        let snapshot = state.clone();
        branch(state, self)?;
        self.checker.admit(state, Some(self.parent), self.depth + 1)?;
        *state = snapshot;
        Ok(())
    }
}

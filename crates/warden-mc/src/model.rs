//! The contract a state type must satisfy to be checked.

use std::fmt::Display;
use std::hash::Hash;

use crate::checker::CheckResult;
use crate::emitter::Emitter;

/// A checkable model: a plain-data state type plus the predicates and the
/// successor relation the engine drives.
///
/// `Eq` and `Hash` must agree and must cover every semantically significant
/// field; the engine derives state fingerprints from `Hash`. Predecessor
/// linkage is engine metadata kept in the seen set, never a state field, so
/// a logical state reached from two parents is stored once.
pub trait Model: Clone + Eq + Hash + Display {
    /// True iff this state is acceptable. The first reachable state where
    /// this returns false stops the run with a counterexample trace.
    fn satisfy_invariant(&self) -> bool;

    /// True iff exploration should continue *from* this state. States that
    /// fail the constraint are recorded but never expanded; this is how a
    /// model bounds an otherwise unbounded state space. Constraint failure
    /// is pruning, not a finding.
    fn satisfy_constraint(&self) -> bool {
        true
    }

    /// Enumerate successor states by mutating `self` between
    /// [`Emitter::either`] calls. Forward the emitter's error with `?`; it
    /// is how a violation found mid-generation unwinds to the exploration
    /// loop.
    fn generate(&mut self, emit: &mut Emitter<'_, Self>) -> CheckResult<()>;
}

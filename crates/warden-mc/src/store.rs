//! State storage for model checking.

use std::collections::HashMap;

use tracing::error;

use crate::checker::{CheckError, CheckResult};
use crate::fingerprint::{Fingerprint, FingerprintBuildHasher};

/// How a state was reached.
#[derive(Debug, Clone)]
pub struct StateInfo<M> {
    /// The stored state copy (kept so trace reconstruction stays valid
    /// after the working state has moved on).
    pub state: M,
    /// Predecessor fingerprint (`None` for initial states).
    pub predecessor: Option<Fingerprint>,
    /// Depth from the initial states.
    pub depth: usize,
}

/// The seen set: fingerprint → stored state copy plus predecessor link.
///
/// Insert-only during a run. Keys are already hashes, so the map uses the
/// identity hasher.
pub struct StateStore<M> {
    states: HashMap<Fingerprint, StateInfo<M>, FingerprintBuildHasher>,
    collisions: usize,
}

impl<M: Clone + PartialEq> StateStore<M> {
    pub fn new() -> Self {
        Self {
            states: HashMap::default(),
            collisions: 0,
        }
    }

    /// Try to insert a new state. Returns true if the state was new.
    ///
    /// An occupied slot holding a *different* state is a hash collision.
    /// The insert still reports "duplicate", so the colliding state is
    /// never explored (the known soundness limitation of fingerprint
    /// deduplication), but it is counted and logged once.
    pub fn insert(
        &mut self,
        fp: Fingerprint,
        state: M,
        predecessor: Option<Fingerprint>,
        depth: usize,
    ) -> bool {
        use std::collections::hash_map::Entry;
        match self.states.entry(fp) {
            Entry::Occupied(occupied) => {
                if occupied.get().state != state {
                    self.collisions += 1;
                    if self.collisions == 1 {
                        error!(
                            fingerprint = %fp,
                            "hash collision detected: distinct states share a fingerprint, the state space will be under-explored"
                        );
                    }
                }
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(StateInfo {
                    state,
                    predecessor,
                    depth,
                });
                true
            }
        }
    }

    /// Check if a fingerprint has been seen before.
    #[inline]
    pub fn contains(&self, fp: Fingerprint) -> bool {
        self.states.contains_key(&fp)
    }

    /// Get stored state info by fingerprint.
    pub fn get(&self, fp: Fingerprint) -> Option<&StateInfo<M>> {
        self.states.get(&fp)
    }

    /// Number of states stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of hash collisions observed.
    #[inline]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Iterate over all stored entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Fingerprint, &StateInfo<M>)> {
        self.states.iter().map(|(fp, info)| (*fp, info))
    }

    /// Reconstruct the path from an initial state to `fp` by walking
    /// predecessor links, returned in discovery order.
    ///
    /// A predecessor missing from the store means the admission invariant
    /// was broken somewhere. That is an engine defect, reported as such
    /// rather than truncating the trace.
    pub fn trace_to(&self, fp: Fingerprint) -> CheckResult<Vec<M>> {
        let mut trace = Vec::new();
        let mut current = Some(fp);
        while let Some(cfp) = current {
            let info = self
                .states
                .get(&cfp)
                .ok_or(CheckError::BrokenTrace { missing: cfp })?;
            trace.push(info.state.clone());
            current = info.predecessor;
        }
        trace.reverse();
        Ok(trace)
    }
}

impl<M: Clone + PartialEq> Default for StateStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

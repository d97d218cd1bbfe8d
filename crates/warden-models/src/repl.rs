//! A Raft-style replication model: three nodes with term-tagged logs and a
//! single global election term.
//!
//! The interesting invariant is about committed writes: once a primary's
//! last entry is replicated to a majority it is acknowledged to the client,
//! so no reachable state may allow that entry to be rolled back against
//! another node's log. Whether "replicated to a majority" alone is enough
//! to commit is the model's parameter: counting replicas regardless of the
//! entry's term admits a rollback of an acknowledged write (a primary from
//! an older term can still have its entry erased after an election), while
//! requiring the entry to carry the current term makes the rule safe.

use std::fmt;

use smallvec::SmallVec;
use warden_mc::{CheckResult, Emitter, Model};

/// Cluster size. Three is the smallest cluster with non-trivial majorities.
const NODES: usize = 3;

/// Election term; also the payload of every log entry.
pub type Term = u8;

/// Per-node log of entry terms. Inline capacity covers the
/// constraint-bounded length.
type Log = SmallVec<[Term; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Primary,
    Secondary,
}

/// One configuration of the replica set.
///
/// `COMMIT_TERM_CHECK` selects the commit rule: `true` (the default) only
/// treats a majority-replicated last entry as committed when its term is
/// the current global term; `false` commits on replication count alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplState<const COMMIT_TERM_CHECK: bool = true> {
    pub term: Term,
    pub roles: [Role; NODES],
    pub logs: [Log; NODES],
}

impl<const COMMIT_TERM_CHECK: bool> ReplState<COMMIT_TERM_CHECK> {
    /// Initial configuration: term 0, node 0 primary, all logs empty.
    pub fn initial() -> Self {
        let mut roles = [Role::Secondary; NODES];
        roles[0] = Role::Primary;
        Self {
            term: 0,
            roles,
            logs: std::array::from_fn(|_| Log::new()),
        }
    }

    fn last_term(log: &Log) -> Term {
        log.last().copied().unwrap_or(0)
    }

    /// Receiver can pull the next entry from sender: sender's log is
    /// strictly longer and the entry before the gap matches.
    fn can_append(&self, receiver: usize, sender: usize) -> bool {
        let rlog = &self.logs[receiver];
        let slog = &self.logs[sender];
        slog.len() > rlog.len()
            && (rlog.is_empty() || slog[rlog.len() - 1] == rlog[rlog.len() - 1])
    }

    fn append_oplog(&mut self, receiver: usize, sender: usize) {
        let next = self.logs[sender][self.logs[receiver].len()];
        self.logs[receiver].push(next);
    }

    /// Syncing from `j` would force `i` to discard its last entry: `j`'s
    /// log ends in a later term and the logs do not extend one another.
    fn can_rollback(&self, i: usize, j: usize) -> bool {
        let ilog = &self.logs[i];
        let jlog = &self.logs[j];
        !ilog.is_empty()
            && !jlog.is_empty()
            && Self::last_term(ilog) < Self::last_term(jlog)
            && (ilog.len() > jlog.len() || jlog[ilog.len() - 1] != ilog[ilog.len() - 1])
    }

    fn rollback_oplog(&mut self, i: usize) {
        self.logs[i].pop();
    }

    /// `i`'s log is at least as up to date as `j`'s: later last term, or
    /// same last term and at least the length.
    fn not_behind(&self, i: usize, j: usize) -> bool {
        let ti = Self::last_term(&self.logs[i]);
        let tj = Self::last_term(&self.logs[j]);
        ti > tj || (ti == tj && self.logs[i].len() >= self.logs[j].len())
    }

    fn is_majority(count: usize) -> bool {
        count * 2 > NODES
    }

    /// A majority of the cluster would vote for `i`.
    fn can_win_election(&self, i: usize) -> bool {
        let ayes = (0..NODES).filter(|&j| self.not_behind(i, j)).count();
        Self::is_majority(ayes)
    }

    /// `i` becomes primary for a fresh term and everyone else steps down.
    /// The new primary does not pad its log with a new-term entry.
    fn become_primary(&mut self, i: usize) {
        self.term += 1;
        self.roles = [Role::Secondary; NODES];
        self.roles[i] = Role::Primary;
    }

    fn client_write(&mut self, i: usize) {
        self.logs[i].push(self.term);
    }

    /// The last entry of `me`'s log counts as committed: `me` is primary,
    /// a majority stores the entry at the same index, and (under the safe
    /// rule) the entry carries the current term.
    fn is_committed(&self, me: usize) -> bool {
        if self.roles[me] != Role::Primary || self.logs[me].is_empty() {
            return false;
        }
        let len = self.logs[me].len();
        let last = self.logs[me][len - 1];
        if COMMIT_TERM_CHECK && last != self.term {
            return false;
        }
        let holders = (0..NODES)
            .filter(|&n| self.logs[n].len() >= len && self.logs[n][len - 1] == last)
            .count();
        Self::is_majority(holders)
    }

    /// True in any state where some node's committed last entry could
    /// still be rolled back against another log.
    fn rollback_of_committed(&self) -> bool {
        (0..NODES).any(|me| {
            self.is_committed(me) && (0..NODES).any(|j| j != me && self.can_rollback(me, j))
        })
    }
}

impl<const COMMIT_TERM_CHECK: bool> fmt::Display for ReplState<COMMIT_TERM_CHECK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[term: {}, roles: [", self.term)?;
        for (i, role) in self.roles.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match role {
                Role::Primary => write!(f, "P")?,
                Role::Secondary => write!(f, "S")?,
            }
        }
        write!(f, "], logs: [")?;
        for (i, log) in self.logs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (k, entry) in log.iter().enumerate() {
                if k > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{entry}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]]")
    }
}

impl<const COMMIT_TERM_CHECK: bool> Model for ReplState<COMMIT_TERM_CHECK> {
    fn satisfy_invariant(&self) -> bool {
        !self.rollback_of_committed()
    }

    /// Bounds the state space: stop expanding once the term passes 3 or
    /// any log reaches 3 entries.
    fn satisfy_constraint(&self) -> bool {
        self.term <= 3 && self.logs.iter().all(|log| log.len() < 3)
    }

    fn generate(&mut self, emit: &mut Emitter<'_, Self>) -> CheckResult<()> {
        // AppendOplog
        for receiver in 0..NODES {
            for sender in 0..NODES {
                if receiver != sender && self.can_append(receiver, sender) {
                    emit.either(self, |s, _| {
                        s.append_oplog(receiver, sender);
                        Ok(())
                    })?;
                }
            }
        }
        // RollbackOplog
        for i in 0..NODES {
            for j in 0..NODES {
                if i != j && self.can_rollback(i, j) {
                    emit.either(self, |s, _| {
                        s.rollback_oplog(i);
                        Ok(())
                    })?;
                }
            }
        }
        // BecomePrimary
        for i in 0..NODES {
            if self.can_win_election(i) {
                emit.either(self, |s, _| {
                    s.become_primary(i);
                    Ok(())
                })?;
            }
        }
        // ClientWrite
        for i in 0..NODES {
            if self.roles[i] == Role::Primary {
                emit.either(self, |s, _| {
                    s.client_write(i);
                    Ok(())
                })?;
            }
        }
        Ok(())
    }
}

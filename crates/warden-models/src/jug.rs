//! The two-jug measuring puzzle: a 5-unit jug, a 3-unit jug, and six moves.
//!
//! With the default `FORBIDDEN` amount of 4, the checker's counterexample
//! is the classic solution for measuring exactly four units.

use std::fmt;

use warden_mc::{CheckResult, Emitter, Model};

const BIG_CAP: u8 = 5;
const SMALL_CAP: u8 = 3;

/// One configuration of the two jugs. The invariant fails when the big jug
/// holds exactly `FORBIDDEN` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JugState<const FORBIDDEN: u8 = 4> {
    pub big: u8,
    pub small: u8,
}

impl<const FORBIDDEN: u8> JugState<FORBIDDEN> {
    /// Both jugs empty.
    pub fn empty() -> Self {
        Self { big: 0, small: 0 }
    }
}

impl<const FORBIDDEN: u8> fmt::Display for JugState<FORBIDDEN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[big: {}, small: {}]", self.big, self.small)
    }
}

impl<const FORBIDDEN: u8> Model for JugState<FORBIDDEN> {
    fn satisfy_invariant(&self) -> bool {
        self.big != FORBIDDEN
    }

    fn generate(&mut self, emit: &mut Emitter<'_, Self>) -> CheckResult<()> {
        // FillSmallJug
        emit.either(self, |s, _| {
            s.small = SMALL_CAP;
            Ok(())
        })?;
        // FillBigJug
        emit.either(self, |s, _| {
            s.big = BIG_CAP;
            Ok(())
        })?;
        // EmptySmallJug
        emit.either(self, |s, _| {
            s.small = 0;
            Ok(())
        })?;
        // EmptyBigJug
        emit.either(self, |s, _| {
            s.big = 0;
            Ok(())
        })?;
        // SmallToBig
        emit.either(self, |s, _| {
            if s.big + s.small > BIG_CAP {
                s.small = s.big + s.small - BIG_CAP;
                s.big = BIG_CAP;
            } else {
                s.big += s.small;
                s.small = 0;
            }
            Ok(())
        })?;
        // BigToSmall
        emit.either(self, |s, _| {
            if s.big + s.small > SMALL_CAP {
                s.big = s.big + s.small - SMALL_CAP;
                s.small = SMALL_CAP;
            } else {
                s.small += s.big;
                s.big = 0;
            }
            Ok(())
        })?;
        Ok(())
    }
}

#![no_main]
use std::fmt;
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use warden_mc::{CheckConfig, CheckResult, Checker, Emitter, Model};

/// A transition system decoded from the fuzz input: byte `node * 3 + k` of
/// the table names successor `k` of that node, when present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ByteMachine {
    node: u8,
    bad: u8,
    table: Arc<Vec<u8>>,
}

impl fmt::Display for ByteMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node: {}", self.node)
    }
}

impl ByteMachine {
    fn nodes(&self) -> u8 {
        (self.table.len() % 16) as u8 + 1
    }
}

impl Model for ByteMachine {
    fn satisfy_invariant(&self) -> bool {
        self.node != self.bad
    }

    fn generate(&mut self, emit: &mut Emitter<'_, Self>) -> CheckResult<()> {
        let n = self.nodes();
        for k in 0..3usize {
            let idx = self.node as usize * 3 + k;
            let next = self.table.get(idx).copied();
            if let Some(next) = next {
                emit.either(self, |s, _| {
                    s.node = next % n;
                    Ok(())
                })?;
            }
        }
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let machine = ByteMachine {
        node: 0,
        bad: data[0] % 17,
        table: Arc::new(data[1..].to_vec()),
    };
    let mut checker = Checker::new(CheckConfig {
        max_states: 1_000,
        max_depth: 50,
    });
    // Violations are ordinary outcomes; an Err is an engine consistency bug.
    checker.run(vec![machine]).expect("engine internal error");
});

//! Criterion benchmarks for the bundled models.
//!
//! Run with: cargo bench -p warden-models

use criterion::{criterion_group, criterion_main, Criterion};
use warden_mc::{CheckConfig, Checker};
use warden_models::{JugState, ReplState};

fn bench_jug(c: &mut Criterion) {
    // Forbidden amount 6 is unreachable, so the run exhausts the space.
    c.bench_function("jug_full_space", |b| {
        b.iter(|| {
            let mut checker = Checker::new(CheckConfig::default());
            checker.run(vec![JugState::<6>::empty()]).unwrap()
        })
    });
}

fn bench_repl(c: &mut Criterion) {
    c.bench_function("repl_full_space", |b| {
        b.iter(|| {
            let mut checker = Checker::new(CheckConfig::default());
            checker.run(vec![ReplState::<true>::initial()]).unwrap()
        })
    });
}

criterion_group!(benches, bench_jug, bench_repl);
criterion_main!(benches);

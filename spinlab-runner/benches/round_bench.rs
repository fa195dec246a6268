//! Criterion benchmarks for the prediction round hot path.
//!
//! Run with: `cargo bench -p spinlab-runner`
//!
//! Measures a full observe-grade-predict round against the in-memory store
//! at several history depths, plus the strategy fan-out in isolation via a
//! manager with no prior rounds to grade.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spinlab_core::domain::SessionId;
use spinlab_runner::config::ManagerConfig;
use spinlab_runner::manager::StrategyManager;
use spinlab_runner::store::MemoryStore;
use std::sync::Arc;

fn seeded_history(len: usize) -> Vec<i64> {
    (0..len).map(|i| ((i * 17 + 11) % 37) as i64).collect()
}

fn manager_with_history(history: &[i64]) -> (StrategyManager, SessionId) {
    let manager = StrategyManager::new(Arc::new(MemoryStore::new()), ManagerConfig::default());
    let session = SessionId::new("bench");
    let report = manager.initialize(&session, history);
    assert!(report.success);
    (manager, session)
}

/// One full round: append, grade, fan out, persist, select.
fn bench_full_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_round");

    for depth in [10usize, 100, 1000].iter() {
        let history = seeded_history(*depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            let (manager, session) = manager_with_history(&history);
            // Warm round so every subsequent iteration also grades.
            manager.add_outcome_and_predict(&session, 7);
            let mut next: i64 = 0;
            b.iter(|| {
                let report = manager.add_outcome_and_predict(&session, black_box(next));
                next = (next + 13) % 37;
                black_box(report)
            });
        });
    }

    group.finish();
}

/// First round after initialize: pure fan-out, nothing pending to grade.
fn bench_first_prediction(c: &mut Criterion) {
    let history = seeded_history(100);
    c.bench_function("first_prediction", |b| {
        b.iter_with_setup(
            || manager_with_history(&history),
            |(manager, session)| black_box(manager.add_outcome_and_predict(&session, 19)),
        );
    });
}

criterion_group!(benches, bench_full_round, bench_first_prediction);
criterion_main!(benches);

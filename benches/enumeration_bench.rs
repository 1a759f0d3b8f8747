//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use terraces::*;

/// Caterpillar-shaped constraints over `n` leaves, rooted at leaf 0.
fn caterpillar(n: usize) -> SupertreeData {
    let constraints = (1..n.saturating_sub(2))
        .step_by(2)
        .map(|i| Constraint::new(i, i + 1, i + 2))
        .collect();
    SupertreeData::new(n, constraints, 0)
}

fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrace");
    for n in [12, 16, 20] {
        let data = caterpillar(n);
        group.bench_with_input(BenchmarkId::new("check", n), &data, |b, data| {
            b.iter(|| check_terrace(black_box(data)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("count", n), &data, |b, data| {
            b.iter(|| count_terrace(black_box(data)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("count_bigint", n), &data, |b, data| {
            b.iter(|| count_terrace_bigint(black_box(data)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_multitree(c: &mut Criterion) {
    let data = caterpillar(14);
    c.bench_function("enumerate_n=14", |b| {
        b.iter(|| enumerate_terrace(black_box(&data)).unwrap().num_trees());
    });
}

criterion_group!(benches, benchmark_strategies, benchmark_multitree);
criterion_main!(benches);

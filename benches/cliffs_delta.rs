//! Cliff's delta benchmark: O(n·m) pairwise vs O(n log n) sorted
//!
//! The dispatcher switches to the sorted algorithm once both samples exceed
//! 500 values; this benchmark shows where the crossover lies.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench cliffs_delta
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evalcompare::stats::{cliffs_delta, cliffs_delta_pairwise, cliffs_delta_sorted, RandomState};

fn samples(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = RandomState::new(7);
    let a = (0..n).map(|_| rng.next_f64()).collect();
    let b = (0..n).map(|_| rng.next_f64() + 0.1).collect();
    (a, b)
}

fn bench_cliffs_delta_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("cliffs_delta");

    for n in [100, 500, 1_000, 5_000] {
        let (a, b) = samples(n);

        group.bench_with_input(BenchmarkId::new("pairwise", n), &n, |bench, _| {
            bench.iter(|| cliffs_delta_pairwise(black_box(&a), black_box(&b)));
        });
        group.bench_with_input(BenchmarkId::new("sorted", n), &n, |bench, _| {
            bench.iter(|| cliffs_delta_sorted(black_box(&a), black_box(&b)));
        });
        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |bench, _| {
            bench.iter(|| cliffs_delta(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cliffs_delta_algorithms);
criterion_main!(benches);

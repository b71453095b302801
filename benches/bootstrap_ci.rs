//! Bootstrap confidence interval benchmark
//!
//! Bootstrap is the only CPU-heavy comparison mode: `iterations × (n1 + n2)`
//! generator draws plus one sort of `iterations` differences.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench bootstrap_ci
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evalcompare::regression::{compare_metric, CompareOptions, TestKind};
use evalcompare::stats::{bootstrap_ci, RandomState};

fn uniform_sample(rng: &mut RandomState, n: usize, offset: f64) -> Vec<f64> {
    (0..n).map(|_| rng.next_f64() + offset).collect()
}

/// Benchmark: default 10,000 iterations across sample sizes
fn bench_bootstrap_sample_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_ci_sample_size");
    group.sample_size(20);

    for n in [10, 30, 100, 300] {
        let mut rng = RandomState::new(1);
        let control = uniform_sample(&mut rng, n, 0.0);
        let treatment = uniform_sample(&mut rng, n, 0.1);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut rng = RandomState::new(42);
                bootstrap_ci(
                    black_box(&control),
                    black_box(&treatment),
                    0.95,
                    10_000,
                    &mut rng,
                )
            });
        });
    }

    group.finish();
}

/// Benchmark: iteration count at a fixed sample size of 30
fn bench_bootstrap_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_ci_iterations");

    let mut rng = RandomState::new(1);
    let control = uniform_sample(&mut rng, 30, 0.0);
    let treatment = uniform_sample(&mut rng, 30, 0.1);

    for iterations in [1_000, 5_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                b.iter(|| {
                    let mut rng = RandomState::new(42);
                    bootstrap_ci(&control, &treatment, 0.95, black_box(iterations), &mut rng)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: full metric comparison, Welch vs bootstrap
fn bench_compare_metric(c: &mut Criterion) {
    let mut rng = RandomState::new(1);
    let control = uniform_sample(&mut rng, 30, 0.0);
    let treatment = uniform_sample(&mut rng, 30, 0.1);

    for test in [TestKind::Welch, TestKind::Bootstrap] {
        let options = CompareOptions {
            seed: Some(42),
            ..CompareOptions::with_test(test)
        };
        c.bench_function(&format!("compare_metric_{test}"), |b| {
            b.iter(|| {
                compare_metric("accuracy", black_box(&control), black_box(&treatment), &options)
            });
        });
    }
}

criterion_group!(
    benches,
    bench_bootstrap_sample_size,
    bench_bootstrap_iterations,
    bench_compare_metric
);
criterion_main!(benches);

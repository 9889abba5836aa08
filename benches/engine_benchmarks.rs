//! Engine benchmarks with 95% confidence intervals.
//!
//! Reproducible performance measurements for the Cholesky-based GP fit,
//! posterior prediction, and the full optimization loop.
//!
//! Run with: cargo criterion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use optimizar::config::{BoConfig, InitialDesign, RunSettings};
use optimizar::dataset::Dataset;
use optimizar::domain::{Dimension, Domain};
use optimizar::engine::rng::SeededRng;
use optimizar::engine::runner::BoRunner;
use optimizar::engine::sampling::{latin_hypercube, DesignMethod};
use optimizar::gp::{GaussianProcess, GpConfig, Posterior};
use optimizar::plugins::acquisitions::ExpectedImprovement;
use optimizar::plugins::kernels::RbfKernel;
use optimizar::plugins::optimizers::MultiStartOptimizer;
use optimizar::plugins::oracles::BraninOracle;
use std::sync::Arc;

fn branin_domain() -> Domain {
    Domain::new(vec![
        Dimension::continuous(-5.0, 10.0),
        Dimension::continuous(0.0, 15.0),
    ])
}

fn synthetic_dataset(n: usize) -> Dataset {
    let domain = branin_domain();
    let mut rng = SeededRng::new(42);
    let mut dataset = Dataset::new();
    for point in latin_hypercube(&domain, n, &mut rng) {
        let y = point[0].sin() + point[1].cos();
        dataset.push(point, y, None);
    }
    dataset
}

fn gp_config() -> GpConfig {
    GpConfig {
        kernel: Arc::new(RbfKernel::new(1.0, 1.0)),
        noise: 1e-2,
        jitter: 1e-6,
        domain: branin_domain(),
    }
}

/// GP fit is a full re-decomposition: O(n³) in the observation count.
fn bench_gp_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("GP_Fit");
    group.sample_size(100);
    group.confidence_level(0.95);

    for n in [10, 25, 50].iter() {
        let dataset = synthetic_dataset(*n);
        group.bench_with_input(BenchmarkId::new("cholesky_fit", n), n, |b, _| {
            b.iter(|| {
                let gp = GaussianProcess::fit(dataset.clone(), gp_config())
                    .expect("positive definite");
                black_box(gp.n_observations())
            });
        });
    }

    group.finish();
}

/// Posterior prediction: one triangular solve per test point.
fn bench_gp_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("GP_Predict");
    group.sample_size(100);
    group.confidence_level(0.95);

    let gp = GaussianProcess::fit(synthetic_dataset(25), gp_config()).expect("fit");
    let queries: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 * 0.5 - 5.0, 7.5]).collect();

    group.bench_function("mean_and_variance_20_points", |b| {
        b.iter(|| {
            let mu = gp.mean(&queries);
            let var = gp.variance(&queries);
            black_box((mu, var))
        });
    });

    group.finish();
}

/// Full optimization loop on the Branin oracle.
fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("Full_Run");
    group.sample_size(20); // Fewer samples for the longer benchmark
    group.confidence_level(0.95);

    for budget in [10, 20].iter() {
        group.bench_with_input(BenchmarkId::new("branin", budget), budget, |b, &budget| {
            b.iter(|| {
                let config = BoConfig::builder()
                    .oracle(BraninOracle::new())
                    .kernel(RbfKernel::new(1.0, 1.0))
                    .acquisition(ExpectedImprovement::new(0.01))
                    .optimizer(MultiStartOptimizer::new(5, 20))
                    .settings(RunSettings {
                        initial_design: InitialDesign {
                            method: DesignMethod::Lhs,
                            n: 5,
                        },
                        budget,
                        noise: 0.0,
                        jitter: 1e-6,
                        seed: 42,
                        ..RunSettings::default()
                    })
                    .build()
                    .expect("valid configuration");
                let mut runner = BoRunner::new(config).expect("runner");
                let state = runner.run().expect("run");
                black_box(state.best_so_far)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gp_fit, bench_gp_predict, bench_full_run);
criterion_main!(benches);

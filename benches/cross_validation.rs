//! Cross-validation benchmarks.
//!
//! - Fold count scaling
//! - Sequential vs parallel folds

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use foldboost::cv::{CrossValidator, FoldPlan, FoldStrategy};
use foldboost::model::gbdt::TreeParams;
use foldboost::model::GBDTConfig;
use foldboost::testing::synthetic_regression;
use foldboost::training::Verbosity;

// =============================================================================
// Configuration
// =============================================================================

fn bench_config() -> GBDTConfig {
    GBDTConfig::builder()
        .n_trees(20)
        .learning_rate(0.2)
        .tree(TreeParams::depth_wise(5))
        .verbosity(Verbosity::Silent)
        .build()
        .expect("valid config")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_fold_count(c: &mut Criterion) {
    let data = synthetic_regression(2_000, 10, 42);
    let config = bench_config();

    let mut group = c.benchmark_group("cv/fold_count");
    group.sample_size(10);
    group.throughput(Throughput::Elements(data.n_rows() as u64));

    for k in [2, 5, 10] {
        let validator = CrossValidator::builder().k(k).build();
        group.bench_with_input(BenchmarkId::from_parameter(k), &validator, |b, validator| {
            b.iter(|| black_box(validator.validate_gbdt(black_box(&data), &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_parallel_folds(c: &mut Criterion) {
    let data = synthetic_regression(2_000, 10, 7);
    let config = bench_config();

    let mut group = c.benchmark_group("cv/threads");
    group.sample_size(10);

    for n_threads in [1, 4] {
        let validator = CrossValidator::builder().k(5).n_threads(n_threads).build();
        group.bench_with_input(
            BenchmarkId::from_parameter(n_threads),
            &validator,
            |b, validator| {
                b.iter(|| black_box(validator.validate_gbdt(black_box(&data), &config).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_fold_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("cv/fold_plan");
    for n_rows in [10_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("shuffled", n_rows), &n_rows, |b, &n| {
            b.iter(|| black_box(FoldPlan::new(n, 10, FoldStrategy::Shuffled { seed: 1 }).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fold_count, bench_parallel_folds, bench_fold_plan);
criterion_main!(benches);

//! Criterion benchmarks for tree operations over rollout profiles.

use criterion::{criterion_group, criterion_main, Criterion};
use rollbatch_bench::{reference_profile, stress_profile};
use rollbatch_core::{BatchConfig, PadMode};
use rollbatch_ops::{
    concat_subsample_tree, concat_tree, flatten_first_axis_tree, prepare_batch, seeded_rng,
    split_tree, stack_tree,
};
use rollbatch_test_utils::rollout_step;

fn bench_prepare_batch_reference(c: &mut Criterion) {
    let paths = reference_profile(42);
    let config = BatchConfig::new().with_pad_mode(PadMode::Last);
    c.bench_function("prepare_batch_reference", |b| {
        b.iter(|| {
            let batch = prepare_batch(&paths, &config).unwrap();
            std::hint::black_box(&batch);
        });
    });
}

fn bench_prepare_batch_stress(c: &mut Criterion) {
    let paths = stress_profile(42);
    let config = BatchConfig::new().with_max_length(500);
    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("prepare_batch_stress", |b| {
        b.iter(|| {
            let batch = prepare_batch(&paths, &config).unwrap();
            std::hint::black_box(&batch);
        });
    });
    group.finish();
}

fn bench_stack_steps(c: &mut Criterion) {
    let steps: Vec<_> = (0..200).map(|t| rollout_step(t, 32)).collect();
    c.bench_function("stack_tree_200_steps", |b| {
        b.iter(|| {
            let path = stack_tree(&steps).unwrap();
            std::hint::black_box(&path);
        });
    });
}

fn bench_split_batch(c: &mut Criterion) {
    let paths = reference_profile(42);
    let batch = prepare_batch(&paths, &BatchConfig::new()).unwrap();
    let steps = flatten_first_axis_tree(&batch).unwrap();
    c.bench_function("split_tree_reference", |b| {
        b.iter(|| {
            let rows = split_tree(&steps).unwrap();
            std::hint::black_box(&rows);
        });
    });
}

fn bench_concat(c: &mut Criterion) {
    let paths = reference_profile(42);
    c.bench_function("concat_tree_reference", |b| {
        b.iter(|| {
            let joined = concat_tree(&paths).unwrap();
            std::hint::black_box(&joined);
        });
    });

    let mut rng = seeded_rng(7);
    c.bench_function("concat_subsample_tree_reference_half", |b| {
        b.iter(|| {
            let joined = concat_subsample_tree(&paths, 0.5, &mut rng).unwrap();
            std::hint::black_box(&joined);
        });
    });
}

criterion_group!(
    benches,
    bench_prepare_batch_reference,
    bench_prepare_batch_stress,
    bench_stack_steps,
    bench_split_batch,
    bench_concat
);
criterion_main!(benches);

//! Replacement pass benchmarks
//!
//! - Wide trees: many batch norms under a single container
//! - Deep trees: nested containers, one batch norm per level
//! - Trees without matches (pure traversal cost)

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use normswap::nn::{BatchNorm, Linear, Module, ModuleKind, ReLU, Sequential, SpatialRank};
use normswap::utils::{nullify_batchnorm_modules, replace_all_modules, replace_batchnorm};

/// `blocks` repetitions of linear -> batch norm -> relu
fn wide_model(blocks: usize, width: usize) -> Box<dyn Module> {
    let mut layers: Vec<Box<dyn Module>> = Vec::with_capacity(blocks * 3);
    for _ in 0..blocks {
        layers.push(Box::new(Linear::new(width, width, true).unwrap()));
        layers.push(Box::new(BatchNorm::new(SpatialRank::One, width).unwrap()));
        layers.push(Box::new(ReLU));
    }
    Box::new(Sequential::new(layers))
}

/// `depth` nested containers, each holding a batch norm and the next level
fn deep_model(depth: usize, width: usize) -> Box<dyn Module> {
    let mut current: Box<dyn Module> = Box::new(BatchNorm::new(SpatialRank::Two, width).unwrap());
    for _ in 0..depth {
        current = Box::new(Sequential::new(vec![
            Box::new(BatchNorm::new(SpatialRank::Two, width).unwrap()),
            current,
        ]));
    }
    current
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_wide");
    for blocks in [8, 64, 256] {
        group.bench_with_input(BenchmarkId::new("groupnorm", blocks), &blocks, |b, &n| {
            b.iter_with_setup(
                || wide_model(n, 64),
                |model| black_box(replace_batchnorm(model)),
            );
        });
        group.bench_with_input(BenchmarkId::new("identity", blocks), &blocks, |b, &n| {
            b.iter_with_setup(
                || wide_model(n, 64),
                |model| black_box(nullify_batchnorm_modules(model)),
            );
        });
    }
    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_deep");
    for depth in [8, 32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &d| {
            b.iter_with_setup(
                || deep_model(d, 32),
                |model| black_box(replace_batchnorm(model)),
            );
        });
    }
    group.finish();
}

fn bench_no_match(c: &mut Criterion) {
    c.bench_function("traverse_without_match_256", |b| {
        b.iter_with_setup(
            || wide_model(256, 16),
            |model| {
                black_box(replace_all_modules(model, ModuleKind::GroupNorm, |_| {
                    Ok(Box::new(ReLU))
                }))
            },
        );
    });
}

criterion_group!(benches, bench_wide, bench_deep, bench_no_match);
criterion_main!(benches);

// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stratum_kdtree::KdTree;

fn gen_points(count: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            [
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..1000.0),
            ]
        })
        .collect()
}

fn in_box(lo: &[f64; 3], hi: &[f64; 3], p: &[f64; 3]) -> bool {
    (0..3).all(|d| lo[d] <= p[d] && p[d] <= hi[d])
}

fn bench_kd_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("kd_query");
    let lo = [400.0, 400.0, 400.0];
    let hi = [500.0, 500.0, 500.0];
    for &n in &[10_000usize, 200_000] {
        let points = gen_points(n, 0x0D1CE);
        group.throughput(Throughput::Elements(n as u64));
        for &bucket in &[8usize, 32, 128] {
            let tree = KdTree::with_bucket_size(points.clone(), bucket).expect("no NaN");
            group.bench_function(format!("kd_b{bucket}_n{n}"), |b| {
                b.iter(|| black_box(tree.range_query(black_box(lo), hi).count()));
            });
        }
        group.bench_function(format!("linear_n{n}"), |b| {
            b.iter(|| black_box(points.iter().filter(|p| in_box(&lo, &hi, p)).count()));
        });
    }
    group.finish();
}

fn bench_kd_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("kd_build");
    group.sample_size(20);
    let points = gen_points(200_000, 0xB11D);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("default_bucket_n200000", |b| {
        b.iter_batched(
            || points.clone(),
            |points| black_box(KdTree::build(points).expect("no NaN").depth()),
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_kd_query, bench_kd_build);
criterion_main!(benches);

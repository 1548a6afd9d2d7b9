// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stratum_kdtree::KdTree;

use rstar::{AABB, RTree};

fn gen_points(count: usize) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(0xE7E7);
    (0..count)
        .map(|_| [rng.r#gen(), rng.r#gen(), rng.r#gen()])
        .collect()
}

fn bench_kd_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("kd_external_compare");
    let lo = [0.25, 0.25, 0.25];
    let hi = [0.5, 0.5, 0.5];
    for &n in &[10_000usize, 100_000] {
        let points = gen_points(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("stratum_build_query_n{n}"), |b| {
            b.iter_batched(
                || points.clone(),
                |points| {
                    let tree = KdTree::build(points).expect("no NaN");
                    black_box(tree.range_query(lo, hi).count())
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("rstar_build_query_n{n}"), |b| {
            b.iter_batched(
                || points.clone(),
                |points| {
                    let tree = RTree::bulk_load(points);
                    let envelope = AABB::from_corners(lo, hi);
                    black_box(tree.locate_in_envelope(&envelope).count())
                },
                BatchSize::LargeInput,
            );
        });

        let kd = KdTree::build(points.clone()).expect("no NaN");
        let rs = RTree::bulk_load(points.clone());
        let envelope = AABB::from_corners(lo, hi);
        group.bench_function(format!("stratum_query_n{n}"), |b| {
            b.iter(|| black_box(kd.range_query(black_box(lo), hi).count()));
        });
        group.bench_function(format!("rstar_query_n{n}"), |b| {
            b.iter(|| black_box(rs.locate_in_envelope(black_box(&envelope)).count()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kd_external_compare);
criterion_main!(benches);

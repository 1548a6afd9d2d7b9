// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stratum_fast::{Backing, FastConfig, FastIndex, KeyConverter, RawKey};

fn gen_keys(n: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..i32::MAX / 2)).collect()
}

fn gen_queries(count: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(0x51DE_CA55);
    (0..count).map(|_| rng.gen_range(0..i32::MAX / 2)).collect()
}

fn build(keys: &[i32], config: &FastConfig) -> FastIndex {
    FastIndex::build_with(
        keys.iter().enumerate().map(|(i, &k)| (RawKey::from(k), i)),
        KeyConverter::Identity,
        config,
    )
    .expect("benchmark batch fits")
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let queries = gen_queries(4096);
    group.throughput(Throughput::Elements(queries.len() as u64));
    for &n in &[10_000usize, 1_000_000] {
        let keys = gen_keys(n, 0xFA57);
        let idx = build(&keys, &FastConfig::default().with_bottom_depth(1));
        let mut sorted = keys.clone();
        sorted.sort_unstable();

        group.bench_function(format!("fast_n{n}"), |b| {
            b.iter(|| {
                let mut acc = 0usize;
                for &q in &queries {
                    acc = acc.wrapping_add(idx.rank(black_box(q)));
                }
                black_box(acc)
            });
        });

        group.bench_function(format!("partition_point_n{n}"), |b| {
            b.iter(|| {
                let mut acc = 0usize;
                for &q in &queries {
                    acc = acc.wrapping_add(sorted.partition_point(|&k| k <= black_box(q)));
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");
    let keys = gen_keys(1_000_000, 0xFA57);
    let idx = build(&keys, &FastConfig::default().with_bottom_depth(1));
    let cutoff = i32::MAX / 8;

    group.bench_function("less_than_quarter", |b| {
        b.iter(|| black_box(idx.less_than(black_box(cutoff)).len()));
    });
    group.bench_function("between_narrow", |b| {
        b.iter(|| black_box(idx.between(black_box(cutoff), cutoff + 1_000).len()));
    });
    group.bench_function("linear_filter_quarter", |b| {
        b.iter(|| black_box(keys.iter().filter(|&&k| k < black_box(cutoff)).count()));
    });
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);
    let keys = gen_keys(100_000, 0xB11D);
    group.throughput(Throughput::Elements(keys.len() as u64));
    for (name, backing) in [
        ("thp", Backing::TransparentHugePages),
        ("heap", Backing::Heap),
    ] {
        let config = FastConfig::default()
            .with_bottom_depth(1)
            .with_backing(backing);
        group.bench_function(format!("k1_{name}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| black_box(build(&keys, &config).original_size()),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rank, bench_range, bench_build);
criterion_main!(benches);

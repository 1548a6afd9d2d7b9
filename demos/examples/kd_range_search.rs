// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-dimensional box search.
//!
//! Index parts by (price, weight, size) and find every part inside a box.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p stratum_demos --example kd_range_search`

use std::error::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stratum_kdtree::PointIndex;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(7);
    let parts = (0..200_000_u32).map(|part_key| {
        let point = [
            rng.gen_range(900.0..2100.0),
            rng.gen_range(0.5..50.0),
            f64::from(rng.gen_range(1_u32..=50)),
        ];
        (point, part_key)
    });
    let idx = PointIndex::build(parts)?;
    log::info!(
        "{} parts, tree depth {}, {} bytes",
        idx.len(),
        idx.tree().depth(),
        idx.memory_usage()
    );

    let lo = [1000.0, 10.0, 15.0];
    let hi = [1100.0, 12.5, 15.0];
    let mut hits: Vec<([f64; 3], u32)> = idx.range_search(lo, hi).collect();
    hits.sort_by_key(|&(_, key)| key);
    println!("{} parts in {lo:?} ..= {hi:?}", hits.len());
    for ([price, weight, size], key) in hits.iter().take(5) {
        println!("  part {key}: price {price:.2}, weight {weight:.2}, size {size}");
    }
    Ok(())
}

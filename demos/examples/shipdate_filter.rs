// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Date cutoff filter over a synthetic shipment table.
//!
//! Index ship dates as days since the epoch, then answer "shipped before a
//! cutoff" and "shipped within a window" from the sorted entries, and check
//! both against a full scan.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p stratum_demos --example shipdate_filter`

use std::error::Error;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stratum_fast::{FastConfig, IndexCell, KeyConverter, RawKey};

struct Shipment {
    ship_date: NaiveDate,
    quantity: u32,
}

fn synthesize(rows: usize) -> Result<Vec<Shipment>, Box<dyn Error>> {
    let first = NaiveDate::from_ymd_opt(1992, 1, 2).ok_or("bad start date")?;
    let mut rng = StdRng::seed_from_u64(19_920_102);
    (0..rows)
        .map(|_| -> Result<Shipment, Box<dyn Error>> {
            let ship_date = first
                .checked_add_days(Days::new(rng.gen_range(0..2526)))
                .ok_or("date overflow")?;
            Ok(Shipment {
                ship_date,
                quantity: rng.gen_range(1..=50),
            })
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let table = synthesize(600_000)?;
    let cell = IndexCell::new();
    let idx = cell.build_with(
        table
            .iter()
            .enumerate()
            .map(|(row, s)| (RawKey::Date(s.ship_date), row)),
        KeyConverter::DaysSinceEpoch,
        &FastConfig::default().with_fitted_depth(),
    )?;
    println!(
        "indexed {} shipments (capacity {}, K = {}, {:.1} MiB)",
        idx.original_size(),
        idx.size(),
        idx.bottom_depth(),
        idx.memory_usage() as f64 / (1024.0 * 1024.0)
    );

    let cutoff_date = NaiveDate::from_ymd_opt(1998, 9, 2).ok_or("bad cutoff")?;
    let before = idx.less_than_raw(cutoff_date)?;
    let quantity: u64 = before
        .iter()
        .map(|e| u64::from(table[e.index].quantity))
        .sum();
    let scanned = table.iter().filter(|s| s.ship_date < cutoff_date).count();
    assert_eq!(before.len(), scanned, "index and scan disagree");
    println!(
        "shipped before {cutoff_date}: {} rows, total quantity {quantity}",
        before.len()
    );

    let start = NaiveDate::from_ymd_opt(1994, 1, 1).ok_or("bad start")?;
    let end = NaiveDate::from_ymd_opt(1994, 12, 31).ok_or("bad end")?;
    let year = idx.between_raw(start, end)?;
    if let (Some(first), Some(last)) = (year.first(), year.last()) {
        println!(
            "shipped in 1994: {} rows, {:?} ..= {:?}",
            year.len(),
            idx.decode(first.key)?,
            idx.decode(last.key)?
        );
    }

    // Readers on other threads see the same built index.
    std::thread::scope(|s| {
        for year in 1993..1996 {
            let cell = &cell;
            s.spawn(move || {
                let Ok(idx) = cell.get() else { return };
                let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
                    .and_then(|d| idx.canonical(d).ok());
                if let Some(key) = jan1 {
                    println!("rank of {year}-01-01: {}", idx.rank(key));
                }
            });
        }
    });
    Ok(())
}

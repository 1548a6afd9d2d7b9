// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout builder: writes sorted leaves into the flattened tree.
//!
//! A cache block over `[i, j)` holds five pivot triples. The first triple is
//! the lower median `m` of the range followed by the lower medians of its two
//! halves; the next four are the same triple for each quarter. Because every
//! block covers a range whose length is a multiple of 16, the pivots are the
//! last keys of the first fifteen sixteenths, and two vector compares locate
//! the sixteenth a query falls into.

use crate::key::SENTINEL_KEY;
use crate::leaf::LeafStore;
use crate::shape::{BLOCK_FANOUT, BLOCK_SLOTS, DIRECTORY_BUCKETS, DIRECTORY_LEVELS, pow16};

/// Lower median of the half-open range `[i, j)`.
#[inline]
pub(crate) const fn median(i: usize, j: usize) -> usize {
    i + (j - 1 - i) / 2
}

fn store_triple(dest: &mut [i32], offset: usize, leaves: &LeafStore, i: usize, j: usize) {
    let m = median(i, j);
    dest[offset] = leaves.key_at(m);
    dest[offset + 1] = leaves.key_at(median(i, m));
    dest[offset + 2] = leaves.key_at(median(m + 1, j));
}

fn store_cache_block(
    dest: &mut [i32],
    offset: usize,
    leaves: &LeafStore,
    i: usize,
    j: usize,
) -> usize {
    store_triple(dest, offset, leaves, i, j);
    let m = median(i, j);
    let lm = median(i, m);
    let rm = median(m + 1, j);
    store_triple(dest, offset + 3, leaves, i, lm);
    store_triple(dest, offset + 6, leaves, lm + 1, m);
    store_triple(dest, offset + 9, leaves, m + 1, rm);
    store_triple(dest, offset + 12, leaves, rm + 1, j);
    dest[offset + 15] = SENTINEL_KEY;
    offset + BLOCK_SLOTS
}

/// Write `levels` levels of blocks over `[i, j)` breadth-first. Returns the next free slot.
fn store_page(
    dest: &mut [i32],
    mut offset: usize,
    leaves: &LeafStore,
    i: usize,
    j: usize,
    levels: u32,
) -> usize {
    for level in 0..levels {
        let blocks = pow16(level);
        let chunk = (j - i) / blocks;
        for b in 0..blocks {
            offset = store_cache_block(dest, offset, leaves, i + b * chunk, i + (b + 1) * chunk);
        }
    }
    offset
}

/// Lay out the directory and every bucket stage into `dest`.
///
/// `dest` must be exactly `leaves.shape().total_slots()` long.
///
/// # Panics
///
/// Panics if the write cursor does not end exactly at the end of `dest`;
/// that means the size formulas and the builder disagree.
pub(crate) fn layout(dest: &mut [i32], leaves: &LeafStore) -> usize {
    let shape = leaves.shape();
    let n = shape.capacity();
    debug_assert_eq!(n % (DIRECTORY_BUCKETS * BLOCK_FANOUT), 0);

    let mut offset = store_page(dest, 0, leaves, 0, n, DIRECTORY_LEVELS);
    let chunk = shape.bucket_leaves();
    for bucket in 0..DIRECTORY_BUCKETS {
        offset = store_page(
            dest,
            offset,
            leaves,
            bucket * chunk,
            (bucket + 1) * chunk,
            shape.depth(),
        );
    }
    assert_eq!(
        offset,
        shape.total_slots(),
        "flattened layout wrote {offset} slots, expected {}",
        shape.total_slots()
    );
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FastConfig;
    use crate::key::{KeyConverter, RawKey};
    use crate::shape::DIRECTORY_SLOTS;

    fn leaves(keys: &[i32]) -> LeafStore {
        LeafStore::prepare(
            keys.iter().enumerate().map(|(i, &k)| (RawKey::from(k), i)),
            KeyConverter::Identity,
            &FastConfig::default().with_bottom_depth(1),
        )
        .unwrap()
    }

    #[test]
    fn median_is_lower_for_even_ranges() {
        assert_eq!(median(0, 16), 7);
        assert_eq!(median(0, 15), 7);
        assert_eq!(median(8, 16), 11);
        assert_eq!(median(4, 5), 4);
    }

    #[test]
    fn block_pivots_are_chunk_tails() {
        let keys: Vec<i32> = (0..16).map(|k| k * 10).collect();
        let store = leaves(&keys);
        let mut block = [0; 16];
        assert_eq!(store_cache_block(&mut block, 0, &store, 0, 16), 16);
        assert_eq!(
            block,
            [
                70, 30, 110, // root: tails of halves and quarters
                10, 0, 20, // first quarter
                50, 40, 60, // second quarter
                90, 80, 100, // third quarter
                130, 120, 140, // fourth quarter
                SENTINEL_KEY,
            ]
        );
    }

    #[test]
    fn wide_block_uses_sixteenth_boundaries() {
        let keys: Vec<i32> = (0..64).collect();
        let store = leaves(&keys);
        let mut block = [0; 16];
        store_cache_block(&mut block, 0, &store, 0, 64);
        // Chunk of 4: pivot c sits at 4c - 1.
        let mut pivots: Vec<i32> = block[..15].to_vec();
        pivots.sort_unstable();
        let expected: Vec<i32> = (1..16).map(|c| 4 * c - 1).collect();
        assert_eq!(pivots, expected);
    }

    #[test]
    fn full_layout_ends_at_total_size() {
        let store = leaves(&[5, 1, 9, 3, 3, 7]);
        let mut dest = vec![0; store.shape().total_slots()];
        assert_eq!(layout(&mut dest, &store), store.shape().total_slots());
        // Directory root splits the padded range in half: all sentinel.
        assert_eq!(dest[0], SENTINEL_KEY);
        // First bucket's block holds the real keys.
        let bucket0 = &dest[DIRECTORY_SLOTS..DIRECTORY_SLOTS + 16];
        assert_eq!(&bucket0[..3], &[SENTINEL_KEY, 5, SENTINEL_KEY]);
        assert_eq!(&bucket0[3..6], &[3, 1, 3]);
    }
}

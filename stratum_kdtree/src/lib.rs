// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stratum k-d tree: a static, bucketed k-d tree for box queries.
//!
//! The tree is built once from a batch of `D`-dimensional points and is
//! read-only afterwards, so a shared reference can be queried from many
//! threads.
//!
//! - Internal nodes split round-robin over the axes at the median of their
//!   range, found by linear-time selection.
//! - Ranges of at most `bucket_size` points are leaves, scanned linearly.
//! - [`KdTree::range_query`] returns the slots of all points in a closed box;
//!   every point lives in exactly one leaf, so no point is reported twice,
//!   even when it sits on a split value.
//!
//! [`PointIndex`] pairs each point with a value and keeps the values aligned
//! with the permuted points.
//!
//! # Example
//!
//! ```rust
//! use stratum_kdtree::{KdTree, PointIndex};
//!
//! let tree = KdTree::with_bucket_size([[0, 0], [5, 5], [2, 8], [9, 1]], 1)?;
//! let mut hits: Vec<[i32; 2]> = tree
//!     .range_query([0, 0], [5, 5])
//!     .filter_map(|slot| tree.point(slot).copied())
//!     .collect();
//! hits.sort();
//! assert_eq!(hits, [[0, 0], [5, 5]]);
//!
//! let parts = PointIndex::build([([1.0, 2.0, 3.0], "bolt"), ([4.0, 5.0, 6.0], "nut")])?;
//! let found: Vec<&str> = parts
//!     .range_search([0.0; 3], [2.0, 2.0, 3.0])
//!     .map(|(_, name)| name)
//!     .collect();
//! assert_eq!(found, ["bolt"]);
//! # Ok::<(), stratum_kdtree::KdError>(())
//! ```
//!
//! Coordinates may be `f32`, `f64`, `i32` or `i64`. Floating-point
//! coordinates must not be NaN.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

mod error;
mod index;
mod tree;
mod types;

pub use error::{KdError, Result};
pub use index::PointIndex;
pub use tree::{DEFAULT_BUCKET_SIZE, KdTree, RangeQuery};
pub use types::{Coord, Point};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn tree_is_shareable_across_threads() {
        let tree = KdTree::build((0..500).map(|i| [i, 500 - i])).unwrap();
        std::thread::scope(|s| {
            for t in 0..4 {
                let tree = &tree;
                s.spawn(move || {
                    let lo = t * 100;
                    let hits: Vec<usize> = tree.range_query([lo, 0], [lo + 9, 500]).collect();
                    assert_eq!(hits.len(), 10, "thread {t}");
                });
            }
        });
    }

    #[test]
    fn bucket_size_does_not_change_answers() {
        let points: Vec<[i32; 2]> = (0..300).map(|i| [(i * 37) % 17, (i * 11) % 13]).collect();
        let count = |bucket| {
            KdTree::with_bucket_size(points.clone(), bucket)
                .unwrap()
                .range_query([3, 2], [9, 7])
                .count()
        };
        let expected = count(300);
        for bucket in [1, 2, 5, 32] {
            assert_eq!(count(bucket), expected, "bucket {bucket}");
        }
    }
}

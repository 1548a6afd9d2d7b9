// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value-carrying point index.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Result;
use crate::tree::{DEFAULT_BUCKET_SIZE, KdTree};
use crate::types::{Coord, Point};

/// A [`KdTree`] whose points each carry a value.
///
/// Values are stored in slot order, so the value at slot `i` always belongs
/// to the point at slot `i` however the build permuted the input.
pub struct PointIndex<T: Coord, const D: usize, V: Copy> {
    tree: KdTree<T, D>,
    values: Vec<V>,
}

impl<T: Coord, const D: usize, V: Copy> PointIndex<T, D, V> {
    /// Build with the default bucket size.
    pub fn build(entries: impl IntoIterator<Item = (Point<T, D>, V)>) -> Result<Self> {
        Self::with_bucket_size(entries, DEFAULT_BUCKET_SIZE)
    }

    /// Build with leaves of at most `bucket_size` points.
    pub fn with_bucket_size(
        entries: impl IntoIterator<Item = (Point<T, D>, V)>,
        bucket_size: usize,
    ) -> Result<Self> {
        let (points, by_input): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let tree = KdTree::with_bucket_size(points, bucket_size)?;
        let values = tree.origins().iter().map(|&o| by_input[o]).collect();
        Ok(Self { tree, values })
    }

    /// Every `(point, value)` whose point lies in the closed box `[lo, hi]`.
    pub fn range_search(
        &self,
        lo: Point<T, D>,
        hi: Point<T, D>,
    ) -> impl Iterator<Item = (Point<T, D>, V)> + '_ {
        self.tree
            .range_query(lo, hi)
            .map(|slot| (self.tree.points()[slot], self.values[slot]))
    }

    /// The underlying tree.
    pub fn tree(&self) -> &KdTree<T, D> {
        &self.tree
    }

    /// Values in slot order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bytes held by the tree and the value array.
    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage() + self.values.capacity() * size_of::<V>()
    }
}

impl<T: Coord, const D: usize, V: Copy> Debug for PointIndex<T, D, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointIndex")
            .field("tree", &self.tree)
            .field("values", &self.values.len())
            .finish()
    }
}

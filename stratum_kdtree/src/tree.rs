// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static bucketed k-d tree.
//!
//! Nodes live in one flat vector and own half-open ranges of the point array.
//! An internal node at depth `d` splits on axis `d % D` at the median of its
//! range: points left of the median have that coordinate `<=` the split
//! value and points from the median on have it `>=`. Ranges no longer than
//! the bucket size are leaves and are scanned linearly.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::error::{KdError, Result};
use crate::types::{Coord, Point, cmp_axis, in_box};

/// Leaf size used by [`KdTree::build`].
pub const DEFAULT_BUCKET_SIZE: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug)]
enum Kind<T> {
    Leaf,
    Split {
        axis: usize,
        value: T,
        left: NodeIdx,
        right: NodeIdx,
    },
}

#[derive(Copy, Clone, Debug)]
struct Node<T> {
    begin: usize,
    end: usize,
    kind: Kind<T>,
}

/// Immutable k-d tree over `D`-dimensional points.
///
/// Building permutes the points; [`origin`](Self::origin) maps a slot back to
/// the position the point had in the input.
pub struct KdTree<T: Coord, const D: usize> {
    nodes: Vec<Node<T>>,
    points: Vec<Point<T, D>>,
    origins: Vec<usize>,
    bucket_size: usize,
    depth: usize,
}

struct Builder<'a, T: Coord, const D: usize> {
    nodes: Vec<Node<T>>,
    slots: &'a mut [(Point<T, D>, usize)],
    bucket_size: usize,
    depth: usize,
}

impl<T: Coord, const D: usize> Builder<'_, T, D> {
    fn node(&mut self, begin: usize, end: usize, depth: usize) -> NodeIdx {
        let idx = NodeIdx(self.nodes.len());
        self.depth = self.depth.max(depth);
        self.nodes.push(Node {
            begin,
            end,
            kind: Kind::Leaf,
        });
        if end - begin <= self.bucket_size {
            return idx;
        }

        let axis = depth % D;
        let mid = (begin + end) / 2;
        self.slots[begin..end]
            .select_nth_unstable_by(mid - begin, |a, b| cmp_axis(&a.0, &b.0, axis));
        let value = self.slots[mid].0[axis];

        let left = self.node(begin, mid, depth + 1);
        let right = self.node(mid, end, depth + 1);
        self.nodes[idx.get()].kind = Kind::Split {
            axis,
            value,
            left,
            right,
        };
        idx
    }
}

impl<T: Coord, const D: usize> KdTree<T, D> {
    /// Build with [`DEFAULT_BUCKET_SIZE`].
    pub fn build(points: impl IntoIterator<Item = Point<T, D>>) -> Result<Self> {
        Self::with_bucket_size(points, DEFAULT_BUCKET_SIZE)
    }

    /// Build with leaves of at most `bucket_size` points.
    pub fn with_bucket_size(
        points: impl IntoIterator<Item = Point<T, D>>,
        bucket_size: usize,
    ) -> Result<Self> {
        const { assert!(D > 0, "a k-d tree needs at least one dimension") };
        if bucket_size == 0 {
            return Err(KdError::ZeroBucket);
        }

        let mut slots: Vec<(Point<T, D>, usize)> = points
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, i))
            .collect();
        for (p, i) in &slots {
            if let Some(axis) = p.iter().position(|c| !c.is_ordered()) {
                return Err(KdError::UnorderedCoordinate { point: *i, axis });
            }
        }

        let len = slots.len();
        let mut builder = Builder {
            nodes: Vec::new(),
            slots: &mut slots,
            bucket_size,
            depth: 0,
        };
        if len > 0 {
            builder.node(0, len, 0);
        }
        let Builder { nodes, depth, .. } = builder;

        let (points, origins) = slots.into_iter().unzip();
        log::debug!(
            "k-d tree built with {len} points, {} nodes, depth {depth}",
            nodes.len()
        );
        Ok(Self {
            nodes,
            points,
            origins,
            bucket_size,
            depth,
        })
    }

    /// Slots of every point in the closed box `[lo, hi]`.
    ///
    /// An inverted box (some `lo[d] > hi[d]`) matches nothing.
    pub fn range_query(&self, lo: Point<T, D>, hi: Point<T, D>) -> RangeQuery<'_, T, D> {
        let stack = if self.nodes.is_empty() {
            Vec::new()
        } else {
            vec![NodeIdx(0)]
        };
        RangeQuery {
            tree: self,
            lo,
            hi,
            stack,
            scan: 0..0,
        }
    }

    /// Point stored in `slot`.
    pub fn point(&self, slot: usize) -> Option<&Point<T, D>> {
        self.points.get(slot)
    }

    /// Input position of the point stored in `slot`.
    pub fn origin(&self, slot: usize) -> Option<usize> {
        self.origins.get(slot).copied()
    }

    /// Points in slot order.
    pub fn points(&self) -> &[Point<T, D>] {
        &self.points
    }

    /// Input position per slot, parallel to [`points`](Self::points).
    pub fn origins(&self) -> &[usize] {
        &self.origins
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest leaf size.
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Depth of the deepest node; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Bytes held by nodes, points and the origin map.
    pub fn memory_usage(&self) -> usize {
        size_of::<Self>()
            + self.nodes.capacity() * size_of::<Node<T>>()
            + self.points.capacity() * size_of::<Point<T, D>>()
            + self.origins.capacity() * size_of::<usize>()
    }
}

impl<T: Coord, const D: usize> Debug for KdTree<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdTree")
            .field("points", &self.points.len())
            .field("nodes", &self.nodes.len())
            .field("bucket_size", &self.bucket_size)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Iterator over the slots matched by [`KdTree::range_query`].
#[derive(Clone, Debug)]
pub struct RangeQuery<'a, T: Coord, const D: usize> {
    tree: &'a KdTree<T, D>,
    lo: Point<T, D>,
    hi: Point<T, D>,
    stack: Vec<NodeIdx>,
    scan: Range<usize>,
}

impl<T: Coord, const D: usize> Iterator for RangeQuery<'_, T, D> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let (lo, hi, points) = (&self.lo, &self.hi, &self.tree.points);
            if let Some(slot) = self.scan.find(|&s| in_box(lo, hi, &points[s])) {
                return Some(slot);
            }
            let node = self.tree.nodes[self.stack.pop()?.get()];
            match node.kind {
                Kind::Leaf => self.scan = node.begin..node.end,
                Kind::Split {
                    axis,
                    value,
                    left,
                    right,
                } => {
                    if self.hi[axis] >= value {
                        self.stack.push(right);
                    }
                    if self.lo[axis] <= value {
                        self.stack.push(left);
                    }
                }
            }
        }
    }
}

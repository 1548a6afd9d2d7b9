// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizes and offsets of the flattened tree.
//!
//! The flattened array is made of cache blocks of [`BLOCK_SLOTS`] integers.
//! A stage of `levels` levels holds `16^l` blocks at level `l`, written
//! breadth-first, so the stage occupies `16 · Σ_{l<levels} 16^l` slots and
//! level `l` starts at slot `16 · Σ_{i<l} 16^i` within it.
//!
//! The tree is two stages deep: a fixed directory of [`DIRECTORY_LEVELS`]
//! levels that selects one of [`DIRECTORY_BUCKETS`] buckets, then one bottom
//! stage of `K` levels per bucket, laid out back to back after the directory.

use crate::error::{FastError, Result};

/// Slots per cache block: 5 pivot triples plus one padding slot.
pub const BLOCK_SLOTS: usize = 16;

/// Fan-out of one cache block.
pub const BLOCK_FANOUT: usize = 16;

/// Levels in the fixed directory stage.
pub const DIRECTORY_LEVELS: u32 = 4;

/// Buckets addressed by the directory stage.
pub const DIRECTORY_BUCKETS: usize = pow16(DIRECTORY_LEVELS);

/// Slots occupied by the directory stage (69904).
pub const DIRECTORY_SLOTS: usize = stage_slots(DIRECTORY_LEVELS);

/// Bottom depth used when none is configured.
pub const DEFAULT_BOTTOM_DEPTH: u32 = 3;

/// Largest supported bottom depth; capacity `16^8` still fits a 32-bit rank.
pub const MAX_BOTTOM_DEPTH: u32 = 4;

/// `16^exponent`.
pub const fn pow16(exponent: u32) -> usize {
    1 << (exponent << 2)
}

/// Slots taken by a stage of `levels` levels.
pub const fn stage_slots(levels: u32) -> usize {
    let mut blocks = 0;
    let mut l = 0;
    while l < levels {
        blocks += pow16(l);
        l += 1;
    }
    blocks * BLOCK_SLOTS
}

/// Geometry of a tree with a given bottom depth `K`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeShape {
    depth: u32,
}

impl TreeShape {
    /// Shape with bottom depth `depth`; fails outside `1..=MAX_BOTTOM_DEPTH`.
    pub fn new(depth: u32) -> Result<Self> {
        if (1..=MAX_BOTTOM_DEPTH).contains(&depth) {
            Ok(Self { depth })
        } else {
            Err(FastError::InvalidDepth(depth))
        }
    }

    /// Smallest shape whose capacity holds `len` entries.
    pub fn fitting(len: usize) -> Result<Self> {
        (1..=MAX_BOTTOM_DEPTH)
            .map(|depth| Self { depth })
            .find(|shape| shape.capacity() >= len)
            .ok_or(FastError::CapacityExceeded {
                len,
                capacity: Self {
                    depth: MAX_BOTTOM_DEPTH,
                }
                .capacity(),
                depth: MAX_BOTTOM_DEPTH,
            })
    }

    /// Bottom depth `K`.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Leaf capacity `16^(4+K)`.
    pub const fn capacity(&self) -> usize {
        pow16(DIRECTORY_LEVELS + self.depth)
    }

    /// Leaves covered by one directory bucket, `16^K`.
    pub const fn bucket_leaves(&self) -> usize {
        pow16(self.depth)
    }

    /// Slots taken by one bucket's bottom stage.
    pub const fn bucket_scale(&self) -> usize {
        stage_slots(self.depth)
    }

    /// First slot of bucket `bucket`'s bottom stage.
    pub const fn bucket_base(&self, bucket: usize) -> usize {
        DIRECTORY_SLOTS + bucket * self.bucket_scale()
    }

    /// Length of the flattened array.
    pub const fn total_slots(&self) -> usize {
        stage_slots(DIRECTORY_LEVELS + self.depth)
    }

    /// Combine a bucket id and an offset within it into a leaf position.
    pub const fn rank_of(&self, bucket: usize, within: usize) -> usize {
        (bucket << (self.depth << 2)) | within
    }
}

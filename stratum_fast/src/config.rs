// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build configuration.

use crate::error::Result;
use crate::shape::{DEFAULT_BOTTOM_DEPTH, TreeShape};

/// How many levels each directory bucket gets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BottomDepth {
    /// Exactly `K` levels; builds with more than `16^(4+K)` entries fail.
    Fixed(u32),
    /// The smallest `K` whose capacity holds the batch.
    Fit,
}

impl Default for BottomDepth {
    fn default() -> Self {
        Self::Fixed(DEFAULT_BOTTOM_DEPTH)
    }
}

/// Where the flattened tree lives.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backing {
    /// Anonymous mapping advised for transparent huge pages where the OS supports it.
    #[default]
    TransparentHugePages,
    /// Anonymous mapping from the explicit huge-page pool (`MAP_HUGETLB`, Linux only).
    ///
    /// Fails with [`FastError::OutOfMemory`](crate::FastError::OutOfMemory) when
    /// the pool cannot satisfy the request.
    HugeTlb,
    /// Ordinary heap allocation. Opting in trades TLB reach for portability.
    Heap,
}

/// Options for [`FastIndex::build_with`](crate::FastIndex::build_with).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FastConfig {
    /// Bottom-stage depth policy.
    pub bottom_depth: BottomDepth,
    /// Memory backing for the flattened tree.
    pub backing: Backing,
}

impl FastConfig {
    /// Set the bottom depth to a fixed `K`.
    #[must_use]
    pub const fn with_bottom_depth(mut self, depth: u32) -> Self {
        self.bottom_depth = BottomDepth::Fixed(depth);
        self
    }

    /// Pick the smallest bottom depth that holds the batch.
    #[must_use]
    pub const fn with_fitted_depth(mut self) -> Self {
        self.bottom_depth = BottomDepth::Fit;
        self
    }

    /// Set the memory backing.
    #[must_use]
    pub const fn with_backing(mut self, backing: Backing) -> Self {
        self.backing = backing;
        self
    }

    /// Resolve the tree shape for a batch of `len` entries.
    pub(crate) fn shape_for(&self, len: usize) -> Result<TreeShape> {
        match self.bottom_depth {
            BottomDepth::Fixed(depth) => TreeShape::new(depth),
            BottomDepth::Fit => TreeShape::fitting(len),
        }
    }
}

// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `FastIndex` API: build once, then rank and range queries.

use crate::buffer::SlotBuffer;
use crate::config::{Backing, FastConfig};
use crate::descent;
use crate::error::{ConversionError, Result};
use crate::key::{KeyConverter, RawKey};
use crate::layout::layout;
use crate::leaf::{Entry, LeafStore};
use crate::timing::Timed;

/// Immutable FAST-style index over canonical 32-bit keys.
///
/// The flattened tree and the sorted leaves are written during
/// [`build_with`](Self::build_with) and never change afterwards, so a shared
/// reference can be queried from any number of threads.
#[derive(Debug)]
pub struct FastIndex {
    tree: SlotBuffer,
    leaves: LeafStore,
    converter: KeyConverter,
}

impl FastIndex {
    /// Build over integer keys with the default configuration.
    ///
    /// Each entry's record index is its position in `keys`.
    pub fn build(keys: &[i32]) -> Result<Self> {
        Self::build_with(
            keys.iter().enumerate().map(|(i, &k)| (RawKey::from(k), i)),
            KeyConverter::Identity,
            &FastConfig::default(),
        )
    }

    /// Build over `(key, record index)` pairs.
    ///
    /// Fails without retaining anything if a key does not convert, the batch
    /// exceeds the configured capacity, or the tree memory cannot be reserved.
    pub fn build_with<I>(entries: I, converter: KeyConverter, config: &FastConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (RawKey, usize)>,
    {
        let leaves = {
            let _t = Timed::debug("sort leaves");
            LeafStore::prepare(entries, converter, config)?
        };
        Self::from_leaves(leaves, converter, config.backing)
    }

    /// Lay out an already prepared leaf store.
    pub fn from_leaves(
        leaves: LeafStore,
        converter: KeyConverter,
        backing: Backing,
    ) -> Result<Self> {
        let shape = leaves.shape();
        let mut tree = SlotBuffer::allocate(shape.total_slots(), backing)?;
        {
            let _t = Timed::debug("flatten tree");
            layout(tree.as_mut_slice(), &leaves);
        }
        log::info!(
            "FAST tree built with {} entries, padded to {} (K = {})",
            leaves.len(),
            shape.capacity(),
            shape.depth()
        );
        Ok(Self {
            tree,
            leaves,
            converter,
        })
    }

    /// Number of padded keys not greater than `key`.
    ///
    /// Ranks past [`original_size`](Self::original_size) land on padding; the
    /// entry before a rank, if real, is the last entry with key `<= key`.
    pub fn rank(&self, key: i32) -> usize {
        let shape = self.leaves.shape();
        let r = descent::rank(self.tree.as_slice(), shape, key);
        // Descent tops out at the last slot; only the leaves know whether it is also <= key.
        if r == shape.capacity() - 1 && self.leaves.key_at(r) <= key {
            r + 1
        } else {
            r
        }
    }

    /// Real entry at a padded position; `None` on padding.
    pub fn entry_at(&self, rank: usize) -> Option<&Entry> {
        self.leaves.get(rank)
    }

    /// Last entry whose key equals `key`.
    pub fn get(&self, key: i32) -> Option<&Entry> {
        // Padding keys are all MAX, so clamp to the real entries before stepping back.
        let r = self.rank(key).min(self.leaves.len());
        r.checked_sub(1)
            .and_then(|p| self.leaves.get(p))
            .filter(|e| e.key == key)
    }

    /// Whether any entry has key `key`.
    pub fn contains(&self, key: i32) -> bool {
        self.get(key).is_some()
    }

    /// Entries with key `< cutoff`, ascending.
    ///
    /// `cutoff` is a canonical key; see [`less_than_raw`](Self::less_than_raw)
    /// for dates and wide integers.
    pub fn less_than(&self, cutoff: i32) -> &[Entry] {
        &self.leaves.entries()[..self.leaves.lower_bound(cutoff)]
    }

    /// Entries with key `> cutoff`, ascending.
    ///
    /// `cutoff` is a canonical key; see
    /// [`greater_than_raw`](Self::greater_than_raw).
    pub fn greater_than(&self, cutoff: i32) -> &[Entry] {
        &self.leaves.entries()[self.leaves.upper_bound(cutoff)..]
    }

    /// Entries with `start <= key <= end`, ascending. Empty when `start > end`.
    ///
    /// Both bounds are canonical keys; see [`between_raw`](Self::between_raw).
    pub fn between(&self, start: i32, end: i32) -> &[Entry] {
        if start > end {
            return &[];
        }
        let lo = self.leaves.lower_bound(start);
        let hi = self.leaves.upper_bound(end);
        &self.leaves.entries()[lo..hi]
    }

    /// [`less_than`](Self::less_than) with a raw cutoff, converted by this index's converter.
    pub fn less_than_raw(
        &self,
        cutoff: impl Into<RawKey>,
    ) -> core::result::Result<&[Entry], ConversionError> {
        Ok(self.less_than(self.canonical(cutoff)?))
    }

    /// [`greater_than`](Self::greater_than) with a raw cutoff.
    pub fn greater_than_raw(
        &self,
        cutoff: impl Into<RawKey>,
    ) -> core::result::Result<&[Entry], ConversionError> {
        Ok(self.greater_than(self.canonical(cutoff)?))
    }

    /// [`between`](Self::between) with raw bounds.
    pub fn between_raw(
        &self,
        start: impl Into<RawKey>,
        end: impl Into<RawKey>,
    ) -> core::result::Result<&[Entry], ConversionError> {
        Ok(self.between(self.canonical(start)?, self.canonical(end)?))
    }

    /// Map a raw key to this index's canonical key space.
    pub fn canonical(&self, raw: impl Into<RawKey>) -> core::result::Result<i32, ConversionError> {
        self.converter.to_canonical(&raw.into())
    }

    /// Map a canonical key back to a raw key.
    pub fn decode(&self, key: i32) -> core::result::Result<RawKey, ConversionError> {
        self.converter.from_canonical(key)
    }

    /// All real entries in ascending key order.
    pub fn entries(&self) -> &[Entry] {
        self.leaves.entries()
    }

    /// Padded capacity `16^(4+K)`.
    pub fn size(&self) -> usize {
        self.leaves.capacity()
    }

    /// Number of real entries.
    pub fn original_size(&self) -> usize {
        self.leaves.len()
    }

    /// Bottom depth `K`.
    pub fn bottom_depth(&self) -> u32 {
        self.leaves.shape().depth()
    }

    /// Key converter chosen at build time.
    pub fn converter(&self) -> KeyConverter {
        self.converter
    }

    /// Memory backing of the flattened tree.
    pub fn backing(&self) -> Backing {
        self.tree.backing()
    }

    /// Bytes held by the flattened tree and the leaf store.
    pub fn memory_usage(&self) -> usize {
        size_of::<Self>() + self.tree.bytes() + self.leaves.memory_usage()
    }
}

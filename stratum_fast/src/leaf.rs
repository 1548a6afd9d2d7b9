// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf store: the sorted `(key, original index)` pairs behind the tree.
//!
//! Only real entries are materialized. Positions from [`LeafStore::len`] up to
//! [`LeafStore::capacity`] read as [`Entry::SENTINEL`], which is exactly what a
//! store padded to capacity would hold.

use crate::config::FastConfig;
use crate::error::{FastError, Result};
use crate::key::{KeyConverter, RawKey, SENTINEL_KEY};
use crate::shape::TreeShape;

/// One leaf: a canonical key and the caller's index for the record it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Canonical ordering key.
    pub key: i32,
    /// Caller-supplied record index, or [`Entry::INVALID`] for padding.
    pub index: usize,
}

impl Entry {
    /// Record index carried by padding entries.
    pub const INVALID: usize = usize::MAX;

    /// The padding entry.
    pub const SENTINEL: Self = Self {
        key: SENTINEL_KEY,
        index: Self::INVALID,
    };

    /// Whether this is padding rather than a real record.
    pub const fn is_sentinel(&self) -> bool {
        self.index == Self::INVALID
    }
}

/// Sorted leaves plus the capacity they are virtually padded to.
#[derive(Clone, Debug)]
pub struct LeafStore {
    entries: Vec<Entry>,
    shape: TreeShape,
}

impl LeafStore {
    /// Convert, sort, and size a batch.
    ///
    /// Any conversion failure aborts the whole batch. Equal keys keep their
    /// input order.
    pub fn prepare<I>(raw: I, converter: KeyConverter, config: &FastConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (RawKey, usize)>,
    {
        let raw = raw.into_iter();
        let mut entries = Vec::with_capacity(raw.size_hint().0);
        for (key, index) in raw {
            entries.push(Entry {
                key: converter.to_canonical(&key)?,
                index,
            });
        }
        Self::from_entries(entries, config)
    }

    /// Sort and size entries whose keys are already canonical.
    pub fn from_entries(mut entries: Vec<Entry>, config: &FastConfig) -> Result<Self> {
        let shape = config.shape_for(entries.len())?;
        if entries.len() > shape.capacity() {
            return Err(FastError::CapacityExceeded {
                len: entries.len(),
                capacity: shape.capacity(),
                depth: shape.depth(),
            });
        }
        entries.sort_by_key(|e| e.key);
        entries.shrink_to_fit();
        Ok(Self { entries, shape })
    }

    /// Shape of the tree these leaves are laid out into.
    pub const fn shape(&self) -> TreeShape {
        self.shape
    }

    /// Number of real entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no real entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Padded length, `16^(4+K)`.
    pub const fn capacity(&self) -> usize {
        self.shape.capacity()
    }

    /// Key at padded position `pos`.
    #[inline]
    pub fn key_at(&self, pos: usize) -> i32 {
        self.entries.get(pos).map_or(SENTINEL_KEY, |e| e.key)
    }

    /// Entry at padded position `pos`; sentinel beyond the real entries.
    pub fn entry_at(&self, pos: usize) -> Entry {
        self.entries.get(pos).copied().unwrap_or(Entry::SENTINEL)
    }

    /// Real entry at position `pos`, if any.
    pub fn get(&self, pos: usize) -> Option<&Entry> {
        self.entries.get(pos)
    }

    /// All real entries in ascending key order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First real position whose key is not less than `key`.
    pub fn lower_bound(&self, key: i32) -> usize {
        self.entries.partition_point(|e| e.key < key)
    }

    /// First real position whose key is greater than `key`.
    pub fn upper_bound(&self, key: i32) -> usize {
        self.entries.partition_point(|e| e.key <= key)
    }

    /// Bytes held by the entry buffer.
    pub fn memory_usage(&self) -> usize {
        self.entries.capacity() * size_of::<Entry>()
    }
}

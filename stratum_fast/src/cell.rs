// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build-once slot for sharing an index between threads.

use std::sync::OnceLock;

use crate::config::FastConfig;
use crate::error::{FastError, Result};
use crate::index::FastIndex;
use crate::key::{KeyConverter, RawKey};

/// Holds at most one [`FastIndex`], built exactly once.
///
/// Readers call [`get`](Self::get) and receive [`FastError::NotBuilt`] until
/// a build has completed; a second build is refused with
/// [`FastError::AlreadyBuilt`]. No reader ever sees a partially built index.
#[derive(Debug, Default)]
pub struct IndexCell {
    slot: OnceLock<FastIndex>,
}

impl IndexCell {
    /// An empty cell.
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Build the index and publish it.
    ///
    /// When two builds race, the loser's index is dropped and it receives
    /// [`FastError::AlreadyBuilt`].
    pub fn build_with<I>(
        &self,
        entries: I,
        converter: KeyConverter,
        config: &FastConfig,
    ) -> Result<&FastIndex>
    where
        I: IntoIterator<Item = (RawKey, usize)>,
    {
        if self.slot.get().is_some() {
            return Err(FastError::AlreadyBuilt);
        }
        let index = FastIndex::build_with(entries, converter, config)?;
        self.slot.set(index).map_err(|_| FastError::AlreadyBuilt)?;
        self.get()
    }

    /// The built index.
    pub fn get(&self) -> Result<&FastIndex> {
        self.slot.get().ok_or(FastError::NotBuilt)
    }

    /// Whether a build has completed.
    pub fn is_built(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Take the index out, leaving the cell empty.
    pub fn take(&mut self) -> Option<FastIndex> {
        self.slot.take()
    }
}

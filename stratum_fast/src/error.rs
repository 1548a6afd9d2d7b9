// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for building and querying a [`FastIndex`](crate::FastIndex).

use std::io;

use thiserror::Error;

use crate::key::KeyKind;

/// Result type alias using [`FastError`].
pub type Result<T> = core::result::Result<T, FastError>;

/// Errors surfaced by index construction and the build-once cell.
///
/// Layout bookkeeping mismatches and corrupt descent decodes are not listed
/// here: those are programming errors and panic instead.
#[derive(Debug, Error)]
pub enum FastError {
    /// A raw key could not be mapped to the canonical 32-bit ordering key.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The batch holds more entries than a tree of the requested depth can address.
    #[error("{len} entries exceed capacity {capacity} of bottom depth {depth}")]
    CapacityExceeded {
        /// Number of entries supplied.
        len: usize,
        /// Leaf capacity `16^(4+depth)`.
        capacity: usize,
        /// Requested bottom depth.
        depth: u32,
    },

    /// Bottom depth outside the supported range.
    #[error("bottom depth {0} is outside 1..={max}", max = crate::shape::MAX_BOTTOM_DEPTH)]
    InvalidDepth(u32),

    /// Query issued against a cell that has not been built.
    #[error("index has not been built")]
    NotBuilt,

    /// Second build attempted on a cell that already holds an index.
    #[error("index has already been built")]
    AlreadyBuilt,

    /// The operating system refused the flattened-array mapping.
    #[error("failed to reserve {bytes} bytes for the flattened tree")]
    OutOfMemory {
        /// Requested mapping size.
        bytes: usize,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// A raw key that has no canonical 32-bit representation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The value does not fit the canonical key range.
    #[error("value {0} does not fit a 32-bit ordering key")]
    OutOfRange(i64),

    /// The converter does not accept this kind of key.
    #[error("converter expects {expected:?} keys, got {found:?}")]
    KindMismatch {
        /// Kind accepted by the converter.
        expected: KeyKind,
        /// Kind that was supplied.
        found: KeyKind,
    },

    /// A canonical key that does not decode to a valid raw key.
    #[error("canonical key {0} does not decode to a valid value")]
    InvalidCanonical(i32),
}

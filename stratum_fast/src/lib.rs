// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stratum FAST: a static, SIMD-searched ordered index over 32-bit keys.
//!
//! The index is built once from a batch of `(key, record index)` pairs and is
//! read-only afterwards. Keys are laid out as an implicit search tree in
//! 64-byte cache blocks; each block holds five pivot triples, and two 4-lane
//! vector compares per block select one of sixteen children.
//!
//! - [`FastIndex::rank`] returns the number of keys `<=` a query.
//! - [`FastIndex::less_than`], [`FastIndex::greater_than`] and
//!   [`FastIndex::between`] return contiguous, ascending slices of entries.
//! - Dates and wide integers map into the 32-bit key space through a
//!   [`KeyConverter`].
//!
//! # Example
//!
//! ```rust
//! use stratum_fast::{FastConfig, FastIndex, KeyConverter, RawKey};
//!
//! let keys = [5, 1, 9, 3, 3, 7];
//! let config = FastConfig::default().with_bottom_depth(1);
//! let idx = FastIndex::build_with(
//!     keys.iter().enumerate().map(|(i, &k)| (RawKey::from(k), i)),
//!     KeyConverter::Identity,
//!     &config,
//! )?;
//!
//! assert_eq!(idx.rank(3), 3);
//! assert_eq!(idx.rank(0), 0);
//! assert_eq!(idx.original_size(), 6);
//!
//! let cheap: Vec<usize> = idx.less_than(5).iter().map(|e| e.index).collect();
//! assert_eq!(cheap, [1, 3, 4]);
//! # Ok::<(), stratum_fast::FastError>(())
//! ```
//!
//! ## Sizing
//!
//! The tree is a fixed four-level directory over 65 536 buckets plus a
//! bottom stage of `K` levels per bucket, for a capacity of `16^(4 + K)`
//! keys. The default `K = 3` holds 2^28 keys and reserves about a gigabyte of
//! tree memory up front; use [`FastConfig::with_bottom_depth`] or
//! [`FastConfig::with_fitted_depth`] for smaller batches.
//!
//! ## Backing memory
//!
//! Tree memory is an anonymous mapping with a transparent huge page hint by
//! default. See [`Backing`] for explicit huge pages or a plain heap vector.
//!
//! ## Sharing
//!
//! A built [`FastIndex`] is `Send + Sync`. [`IndexCell`] publishes one index
//! to many readers and reports queries before the build as
//! [`FastError::NotBuilt`].

mod buffer;
mod cell;
mod config;
mod descent;
mod error;
mod index;
mod key;
mod layout;
mod leaf;
pub mod shape;
mod timing;

pub use cell::IndexCell;
pub use config::{Backing, BottomDepth, FastConfig};
pub use error::{ConversionError, FastError, Result};
pub use index::FastIndex;
pub use key::{KeyConverter, KeyKind, RawKey, SENTINEL_KEY};
pub use leaf::{Entry, LeafStore};
pub use shape::TreeShape;

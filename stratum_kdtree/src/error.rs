// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build errors.

use thiserror::Error;

/// Result alias for k-d tree builds.
pub type Result<T> = core::result::Result<T, KdError>;

/// Why a k-d tree could not be built.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum KdError {
    /// A coordinate has no total order with the others (a NaN).
    #[error("coordinate {axis} of point {point} is unordered")]
    UnorderedCoordinate {
        /// Insertion position of the offending point.
        point: usize,
        /// Axis of the offending coordinate.
        axis: usize,
    },
    /// Leaves must hold at least one point.
    #[error("bucket size must be at least 1")]
    ZeroBucket,
}

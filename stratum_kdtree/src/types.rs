// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate scalars and box predicates.

use core::cmp::Ordering;
use core::fmt::Debug;

/// A point in `D` dimensions.
pub type Point<T, const D: usize> = [T; D];

/// Scalar usable as a k-d tree coordinate.
///
/// Implemented for `f32`, `f64`, `i32` and `i64`. Floating-point coordinates
/// must not be NaN; builds reject them.
pub trait Coord: Copy + PartialOrd + Debug {
    /// Whether this value is totally ordered against every other ordered value.
    fn is_ordered(self) -> bool;
}

macro_rules! int_coord {
    ($($t:ty),*) => {$(
        impl Coord for $t {
            #[inline]
            fn is_ordered(self) -> bool {
                true
            }
        }
    )*};
}

macro_rules! float_coord {
    ($($t:ty),*) => {$(
        impl Coord for $t {
            #[inline]
            fn is_ordered(self) -> bool {
                !self.is_nan()
            }
        }
    )*};
}

int_coord!(i32, i64);
float_coord!(f32, f64);

/// Order two coordinates along one axis. Callers have rejected NaN.
#[inline]
pub(crate) fn cmp_axis<T: Coord, const D: usize>(
    a: &Point<T, D>,
    b: &Point<T, D>,
    axis: usize,
) -> Ordering {
    a[axis].partial_cmp(&b[axis]).unwrap_or(Ordering::Equal)
}

/// Whether `p` lies in the closed box `[lo, hi]` on every axis.
#[inline]
pub(crate) fn in_box<T: Coord, const D: usize>(
    lo: &Point<T, D>,
    hi: &Point<T, D>,
    p: &Point<T, D>,
) -> bool {
    (0..D).all(|d| lo[d] <= p[d] && p[d] <= hi[d])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_unordered() {
        assert!(!f32::NAN.is_ordered());
        assert!(!f64::NAN.is_ordered());
        assert!(f64::INFINITY.is_ordered());
        assert!(i64::MIN.is_ordered());
    }

    #[test]
    fn box_is_closed_on_both_ends() {
        let lo = [0, 0];
        let hi = [5, 5];
        assert!(in_box(&lo, &hi, &[0, 5]));
        assert!(in_box(&lo, &hi, &[5, 0]));
        assert!(!in_box(&lo, &hi, &[2, 8]));
        assert!(!in_box(&lo, &hi, &[-1, 3]));
        // Inverted boxes hold nothing.
        assert!(!in_box(&hi, &lo, &[3, 3]));
    }

    #[test]
    fn axis_order_uses_one_coordinate() {
        assert_eq!(cmp_axis(&[1.0, 9.0], &[2.0, 0.0], 0), Ordering::Less);
        assert_eq!(cmp_axis(&[1.0, 9.0], &[2.0, 0.0], 1), Ordering::Greater);
    }
}

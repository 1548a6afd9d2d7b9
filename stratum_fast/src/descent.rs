// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vectorized descent through the flattened tree.
//!
//! Each level costs two 4-lane compares. The first compares the query with a
//! block's root triple and picks one of four quarters; the second compares it
//! with that quarter's triple. A lane is set when its pivot is `<=` the query,
//! so the walk counts keys not greater than the query and lands on the upper
//! bound.
//!
//! Lane order inside a triple is `(median, left median, right median)`, so a
//! well-formed triple can only produce the masks `000`, `010`, `011`, `111`
//! (lane 0 in the low bit). [`MASK_TO_CHILD`] maps those to `0..4` and every
//! other pattern to [`CORRUPT`].

use crate::shape::{BLOCK_FANOUT, BLOCK_SLOTS, DIRECTORY_LEVELS, TreeShape, pow16};

/// Marker for mask patterns a sorted triple cannot produce.
pub(crate) const CORRUPT: usize = 9;

/// Decode table from a 3-lane comparison mask to a child index.
pub(crate) const MASK_TO_CHILD: [usize; 8] = [0, CORRUPT, 1, 2, CORRUPT, CORRUPT, CORRUPT, 3];

/// Computes the 3-bit "pivot <= query" mask from the first three of four lanes.
pub(crate) type MaskFn = fn(&[i32], i32) -> u32;

/// Portable mask computation; also the reference for the vector paths.
#[inline]
pub(crate) fn pivot_mask_scalar(lanes: &[i32], query: i32) -> u32 {
    u32::from(lanes[0] <= query)
        | (u32::from(lanes[1] <= query) << 1)
        | (u32::from(lanes[2] <= query) << 2)
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code, reason = "SSE2 loads go through a raw pointer.")]
#[inline]
pub(crate) fn pivot_mask(lanes: &[i32], query: i32) -> u32 {
    use core::arch::x86_64::{
        __m128i, _mm_castsi128_ps, _mm_cmpgt_epi32, _mm_loadu_si128, _mm_movemask_ps,
        _mm_set1_epi32,
    };

    let lanes = &lanes[..4];
    // SAFETY: `lanes` is exactly four `i32`s and the load is unaligned. SSE2 is
    // part of the x86_64 baseline.
    let greater = unsafe {
        let pivots = _mm_loadu_si128(lanes.as_ptr().cast::<__m128i>());
        let q = _mm_set1_epi32(query);
        _mm_movemask_ps(_mm_castsi128_ps(_mm_cmpgt_epi32(pivots, q)))
    };
    !(greater as u32) & 0b111
}

#[cfg(target_arch = "aarch64")]
#[allow(unsafe_code, reason = "NEON loads go through a raw pointer.")]
#[inline]
pub(crate) fn pivot_mask(lanes: &[i32], query: i32) -> u32 {
    use core::arch::aarch64::{vaddvq_u32, vandq_u32, vcleq_s32, vdupq_n_s32, vld1q_s32, vld1q_u32};

    const LANE_BITS: [u32; 4] = [1, 2, 4, 8];
    let lanes = &lanes[..4];
    // SAFETY: `lanes` and `LANE_BITS` are exactly four 32-bit values. NEON is
    // part of the aarch64 baseline.
    let bits = unsafe {
        let pivots = vld1q_s32(lanes.as_ptr());
        let le = vcleq_s32(pivots, vdupq_n_s32(query));
        vaddvq_u32(vandq_u32(le, vld1q_u32(LANE_BITS.as_ptr())))
    };
    bits & 0b111
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub(crate) use pivot_mask_scalar as pivot_mask;

#[cold]
#[inline(never)]
fn corrupt_block(block: usize, mask: u32) -> ! {
    panic!("pivot triple in block at slot {block} is out of order (mask {mask:#05b})");
}

#[inline]
fn decode(mask: u32, block: usize) -> usize {
    let child = MASK_TO_CHILD[(mask & 0b111) as usize];
    if child == CORRUPT {
        corrupt_block(block, mask);
    }
    child
}

/// Walk `levels` levels of a stage starting at `base`; returns the leaf offset in the stage.
fn descend_stage(tree: &[i32], base: usize, levels: u32, query: i32, mask: MaskFn) -> usize {
    let mut level_start = base;
    let mut level_offset = 0;
    for level in 0..levels {
        let start = level_start + level_offset * BLOCK_SLOTS;
        let block = &tree[start..start + BLOCK_SLOTS];
        let child = decode(mask(&block[..4], query), start);
        let at = 3 + 3 * child;
        let grandchild = decode(mask(&block[at..at + 4], query), start);
        level_offset = level_offset * BLOCK_FANOUT + child * 4 + grandchild;
        level_start += pow16(level + 1);
    }
    level_offset
}

/// Descend directory then bucket stage with a given mask routine.
pub(crate) fn rank_with(tree: &[i32], shape: TreeShape, query: i32, mask: MaskFn) -> usize {
    let bucket = descend_stage(tree, 0, DIRECTORY_LEVELS, query, mask);
    let within = descend_stage(tree, shape.bucket_base(bucket), shape.depth(), query, mask);
    shape.rank_of(bucket, within)
}

/// `min(upper_bound(query), capacity - 1)` over the padded keys.
#[inline]
pub(crate) fn rank(tree: &[i32], shape: TreeShape, query: i32) -> usize {
    rank_with(tree, shape, query, pivot_mask)
}

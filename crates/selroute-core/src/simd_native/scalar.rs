//! Scalar decision rule and the portable lane-array fallback.
//!
//! [`decide`] is the ground truth: every vector kernel must produce exactly
//! what it produces, lane for lane. The portable kernel below restates the
//! rule with explicit all-ones/all-zeros lane masks so it mirrors the
//! intrinsic kernels step by step on targets without one.

// Reason: comparisons against literal 0.0 are exact IEEE-754 tests here, not
// approximate equality.
#![allow(clippy::float_cmp)]

use crate::config::RouterConfig;
use crate::decision::Decision;

/// Classifies one (query, world) volume pair.
///
/// - `world_volume <= 0`, NaN, or Backend A disabled → [`Decision::BackendB`].
/// - Either volume non-finite → [`Decision::BackendB`].
/// - Otherwise `selectivity = max(query_volume, 0) / world_volume` and the
///   result is [`Decision::BackendA`] iff `selectivity < threshold` (strict:
///   a tie routes to Backend B).
///
/// # Example
///
/// ```
/// use selroute_core::{decide, Decision, RouterConfig};
///
/// let config = RouterConfig::default(); // threshold 0.01
/// assert_eq!(decide(1.0, 1000.0, &config), Decision::BackendA);
/// assert_eq!(decide(10.0, 1000.0, &config), Decision::BackendB); // tie
/// assert_eq!(decide(1.0, 0.0, &config), Decision::BackendB);
/// ```
#[inline]
#[must_use]
pub fn decide(query_volume: f32, world_volume: f32, config: &RouterConfig) -> Decision {
    if !config.backend_a_available() || world_volume.is_nan() || world_volume <= 0.0 {
        return Decision::BackendB;
    }
    if !query_volume.is_finite() || !world_volume.is_finite() {
        return Decision::BackendB;
    }
    let selectivity = query_volume.max(0.0) / world_volume;
    Decision::from_backend_a(selectivity < config.threshold())
}

/// Scalar loop over a slice triple. Lengths are checked by the caller.
#[inline]
pub(crate) fn decide_slice_scalar(
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    debug_assert!(queries.len() == worlds.len() && worlds.len() == out.len());
    for ((slot, &query), &world) in out.iter_mut().zip(queries).zip(worlds) {
        *slot = decide(query, world, config);
    }
}

// =============================================================================
// Portable lane masks
// =============================================================================

const ABS_MASK: u32 = 0x7FFF_FFFF;

/// `true` → all ones, `false` → all zeros, like a SIMD compare result.
#[inline]
fn lane_mask(condition: bool) -> u32 {
    u32::from(condition).wrapping_neg()
}

/// Bitwise blend: `if_set` where `mask` is all ones, `if_clear` elsewhere.
#[inline]
fn blend(mask: u32, if_set: f32, if_clear: f32) -> f32 {
    f32::from_bits((if_set.to_bits() & mask) | (if_clear.to_bits() & !mask))
}

/// One lane of the vector policy, returning the "route to A" mask.
#[inline]
fn route_a_lane(query: f32, world: f32, threshold: f32, available: u32) -> u32 {
    let finite = lane_mask(f32::from_bits(query.to_bits() & ABS_MASK) < f32::INFINITY)
        & lane_mask(f32::from_bits(world.to_bits() & ABS_MASK) < f32::INFINITY);
    let q = query.max(0.0);
    let w = world.max(0.0);
    let world_zero = lane_mask(w == 0.0);
    let denominator = blend(world_zero, 1.0, w);
    let selectivity = blend(world_zero, 1.0, q / denominator);
    let below = lane_mask(selectivity < threshold);
    below & available & !world_zero & finite
}

/// Portable W-lane kernel. Processes `queries.len() / W` full chunks; the
/// caller hands over a W-aligned prefix.
#[cfg_attr(
    any(target_arch = "x86_64", target_arch = "aarch64"),
    allow(dead_code) // Reason: only dispatched on targets without intrinsics; tests use it everywhere
)]
#[inline]
pub(crate) fn decide_chunks_portable<const W: usize>(
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    debug_assert_eq!(queries.len() % W, 0);
    let threshold = config.threshold();
    let available = lane_mask(config.backend_a_available());

    for ((q, w), o) in queries
        .chunks_exact(W)
        .zip(worlds.chunks_exact(W))
        .zip(out.chunks_exact_mut(W))
    {
        let mut masks = [0_u32; W];
        for (mask, (&query, &world)) in masks.iter_mut().zip(q.iter().zip(w)) {
            *mask = route_a_lane(query, world, threshold, available);
        }
        for (slot, mask) in o.iter_mut().zip(masks) {
            *slot = Decision::from_backend_a(mask != 0);
        }
    }
}

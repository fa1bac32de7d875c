//! ARM NEON 4-lane routing kernel for aarch64.
//!
//! NEON is always available on aarch64, so no runtime detection is needed.
//! A forced 8-wide capability runs as two NEON steps per 8-element chunk.

use crate::config::RouterConfig;
use crate::decision::Decision;

/// Classifies `queries.len() / 4` full 4-lane chunks.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn decide_chunks_neon(
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    use std::arch::aarch64::*;

    debug_assert_eq!(queries.len() % 4, 0);

    // SAFETY: NEON intrinsics are always safe on aarch64.
    // Reason: broadcast constants shared by every chunk.
    let (zero, one, infinity, threshold, available) = unsafe {
        (
            vdupq_n_f32(0.0),
            vdupq_n_f32(1.0),
            vdupq_n_f32(f32::INFINITY),
            vdupq_n_f32(config.threshold()),
            vdupq_n_u32(u32::from(config.backend_a_available()).wrapping_neg()),
        )
    };

    for ((q_chunk, w_chunk), out_chunk) in queries
        .chunks_exact(4)
        .zip(worlds.chunks_exact(4))
        .zip(out.chunks_exact_mut(4))
    {
        let mut lanes = [0_u32; 4];
        // SAFETY: each `vld1q_f32` reads exactly the 4 elements of a
        // `chunks_exact(4)` chunk; unaligned loads are fine on ARM64.
        // Reason: core NEON classification of one chunk.
        unsafe {
            let q_raw = vld1q_f32(q_chunk.as_ptr());
            let w_raw = vld1q_f32(w_chunk.as_ptr());

            let finite = vandq_u32(
                vcltq_f32(vabsq_f32(q_raw), infinity),
                vcltq_f32(vabsq_f32(w_raw), infinity),
            );

            let q = vmaxq_f32(q_raw, zero);
            let w = vmaxq_f32(w_raw, zero);
            let world_zero = vceqq_f32(w, zero);

            let denominator = vbslq_f32(world_zero, one, w);
            let selectivity = vbslq_f32(world_zero, one, vdivq_f32(q, denominator));
            let below = vcltq_f32(selectivity, threshold);

            // vbicq_u32(a, b) = a & !b
            let route_a = vbicq_u32(vandq_u32(vandq_u32(below, available), finite), world_zero);
            vst1q_u32(lanes.as_mut_ptr(), route_a);
        }

        for (slot, mask) in out_chunk.iter_mut().zip(lanes) {
            *slot = Decision::from_backend_a(mask != 0);
        }
    }
}

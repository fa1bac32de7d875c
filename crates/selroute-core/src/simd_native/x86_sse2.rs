//! SSE2 4-lane routing kernel for x86_64.
//!
//! SSE2 is part of the x86_64 baseline, so no runtime detection is needed.
//! This kernel also backs a forced 8-wide capability on hosts without AVX2:
//! an 8-aligned prefix is a whole number of 4-lane steps.

#![allow(clippy::cast_sign_loss)]

use crate::config::RouterConfig;
use crate::decision::Decision;

/// Classifies `queries.len() / 4` full 4-lane chunks.
#[cfg(target_arch = "x86_64")]
#[inline]
pub(crate) fn decide_chunks_sse2(
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    use std::arch::x86_64::*;

    debug_assert_eq!(queries.len() % 4, 0);

    // SAFETY: SSE2 is guaranteed on x86_64; these only build constant vectors.
    let (zero, one, infinity, abs_mask, threshold, available) = unsafe {
        (
            _mm_setzero_ps(),
            _mm_set1_ps(1.0),
            _mm_set1_ps(f32::INFINITY),
            _mm_castsi128_ps(_mm_set1_epi32(0x7FFF_FFFF)),
            _mm_set1_ps(config.threshold()),
            _mm_castsi128_ps(_mm_set1_epi32(-i32::from(config.backend_a_available()))),
        )
    };

    for ((q_chunk, w_chunk), out_chunk) in queries
        .chunks_exact(4)
        .zip(worlds.chunks_exact(4))
        .zip(out.chunks_exact_mut(4))
    {
        // SAFETY: SSE2 is guaranteed on x86_64; `_mm_loadu_ps` reads exactly the
        // 4 elements of a `chunks_exact(4)` chunk and permits unaligned access.
        let bits = unsafe {
            let q_raw = _mm_loadu_ps(q_chunk.as_ptr());
            let w_raw = _mm_loadu_ps(w_chunk.as_ptr());

            let finite = _mm_and_ps(
                _mm_cmplt_ps(_mm_and_ps(q_raw, abs_mask), infinity),
                _mm_cmplt_ps(_mm_and_ps(w_raw, abs_mask), infinity),
            );

            let q = _mm_max_ps(q_raw, zero);
            let w = _mm_max_ps(w_raw, zero);
            let world_zero = _mm_cmpeq_ps(w, zero);

            // SSE2 has no blendv: (mask & a) | (!mask & b).
            let denominator = _mm_or_ps(_mm_and_ps(world_zero, one), _mm_andnot_ps(world_zero, w));
            let quotient = _mm_div_ps(q, denominator);
            let selectivity = _mm_or_ps(
                _mm_and_ps(world_zero, one),
                _mm_andnot_ps(world_zero, quotient),
            );
            let below = _mm_cmplt_ps(selectivity, threshold);

            let route_a = _mm_andnot_ps(world_zero, _mm_and_ps(_mm_and_ps(below, available), finite));
            _mm_movemask_ps(route_a) as u32
        };

        for (lane, slot) in out_chunk.iter_mut().enumerate() {
            *slot = Decision::from_backend_a((bits >> lane) & 1 != 0);
        }
    }
}

//! AVX2 8-lane routing kernel for x86_64.
//!
//! Requires runtime AVX2 detection before calling.

#![allow(clippy::cast_sign_loss)]

use crate::config::RouterConfig;
use crate::decision::Decision;

/// Classifies `queries.len() / 8` full 8-lane chunks.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 (enforced by `#[target_feature]` and runtime detection)
/// - `queries.len() == worlds.len() == out.len()` and the length is a multiple
///   of 8 (enforced by the dispatcher's split)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn decide_chunks_avx2(
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    // SAFETY: This function is only called after runtime feature detection confirms AVX2.
    // - `_mm256_loadu_ps` handles unaligned loads safely
    // - Each load reads exactly the 8 elements of a `chunks_exact(8)` chunk
    use std::arch::x86_64::*;

    debug_assert_eq!(queries.len() % 8, 0);

    let zero = _mm256_setzero_ps();
    let one = _mm256_set1_ps(1.0);
    let infinity = _mm256_set1_ps(f32::INFINITY);
    let abs_mask = _mm256_castsi256_ps(_mm256_set1_epi32(0x7FFF_FFFF));
    let threshold = _mm256_set1_ps(config.threshold());
    let available = _mm256_castsi256_ps(_mm256_set1_epi32(-i32::from(
        config.backend_a_available(),
    )));

    for ((q_chunk, w_chunk), out_chunk) in queries
        .chunks_exact(8)
        .zip(worlds.chunks_exact(8))
        .zip(out.chunks_exact_mut(8))
    {
        let q_raw = _mm256_loadu_ps(q_chunk.as_ptr());
        let w_raw = _mm256_loadu_ps(w_chunk.as_ptr());

        // NaN and +/-inf fail the ordered `|x| < inf` test.
        let finite = _mm256_and_ps(
            _mm256_cmp_ps(_mm256_and_ps(q_raw, abs_mask), infinity, _CMP_LT_OQ),
            _mm256_cmp_ps(_mm256_and_ps(w_raw, abs_mask), infinity, _CMP_LT_OQ),
        );

        let q = _mm256_max_ps(q_raw, zero);
        let w = _mm256_max_ps(w_raw, zero);
        let world_zero = _mm256_cmp_ps(w, zero, _CMP_EQ_OQ);

        // Zero-world lanes divide by 1.0 and then take selectivity 1.0.
        let denominator = _mm256_blendv_ps(w, one, world_zero);
        let selectivity = _mm256_blendv_ps(_mm256_div_ps(q, denominator), one, world_zero);
        let below = _mm256_cmp_ps(selectivity, threshold, _CMP_LT_OQ);

        let route_a = _mm256_andnot_ps(
            world_zero,
            _mm256_and_ps(_mm256_and_ps(below, available), finite),
        );
        let bits = _mm256_movemask_ps(route_a) as u32;

        for (lane, slot) in out_chunk.iter_mut().enumerate() {
            *slot = Decision::from_backend_a((bits >> lane) & 1 != 0);
        }
    }
}

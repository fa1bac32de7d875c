//! Fuzz target for batch routing equivalence.
//!
//! Feeds arbitrary volume pairs (NaN, infinities, negatives, subnormals all
//! reachable from raw bits) through every forced capability and checks that
//! batch output matches the scalar rule element by element.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_route_equivalence
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use selroute_core::{decide, Capability, Decision, Router, RouterConfig};

/// Fuzzing input for one batch.
#[derive(Arbitrary, Debug)]
struct RouteInput {
    /// Raw threshold, clamped by the config like any user value
    threshold: f32,
    backend_a_available: bool,
    /// (query, world) pairs
    pairs: Vec<(f32, f32)>,
}

fuzz_target!(|input: RouteInput| {
    // Limit batch size to keep iterations fast
    let max_len = 4096;
    let len = input.pairs.len().min(max_len);
    let (queries, worlds): (Vec<f32>, Vec<f32>) = input.pairs[..len].iter().copied().unzip();

    let config = RouterConfig::new(input.threshold, input.backend_a_available, None);
    let threshold = config.threshold();
    assert!(threshold > 0.0 && threshold <= 1.0, "threshold {threshold} escaped clamp");

    let expected: Vec<Decision> = queries
        .iter()
        .zip(&worlds)
        .map(|(&q, &w)| decide(q, w, &config))
        .collect();

    for capability in [Capability::Scalar, Capability::Vector8, Capability::Vector4] {
        let router = Router::new(config.with_forced_capability(Some(capability)));
        let mut out = vec![Decision::BackendB; len];
        router
            .route_batch(&queries, &worlds, &mut out)
            .expect("equal lengths");
        assert_eq!(out, expected, "capability {capability} diverged from scalar rule");
    }
});

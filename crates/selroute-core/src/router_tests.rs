//! Tests for `router` module - batch routing, dispatch equivalence and errors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::capability::Capability;
use crate::config::RouterConfig;
use crate::decision::Decision::{self, BackendA, BackendB};
use crate::error::RoutingError;
use crate::router::Router;
use crate::simd_native::{decide, Kernel};

const ALL_CAPABILITIES: [Capability; 3] =
    [Capability::Scalar, Capability::Vector8, Capability::Vector4];

const LENGTHS: [usize; 8] = [0, 1, 3, 7, 8, 9, 16, 1000];

fn forced(capability: Capability) -> Router {
    Router::new(RouterConfig::default().with_forced_capability(Some(capability)))
}

/// Mix of selective, broad, boundary and degenerate pairs.
fn random_pairs(rng: &mut StdRng, len: usize) -> (Vec<f32>, Vec<f32>) {
    let mut queries = Vec::with_capacity(len);
    let mut worlds = Vec::with_capacity(len);
    for _ in 0..len {
        let world: f32 = match rng.gen_range(0..10) {
            0 => 0.0,
            1 => -rng.gen_range(0.0..100.0),
            _ => rng.gen_range(1.0..10_000.0),
        };
        let query: f32 = match rng.gen_range(0..10) {
            0 => -rng.gen_range(0.0..10.0),
            1 => world * 0.01,
            _ => rng.gen_range(0.0..200.0),
        };
        queries.push(query);
        worlds.push(world);
    }
    (queries, worlds)
}

fn expected(queries: &[f32], worlds: &[f32], config: &RouterConfig) -> Vec<Decision> {
    queries
        .iter()
        .zip(worlds)
        .map(|(&q, &w)| decide(q, w, config))
        .collect()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_router_uses_forced_capability() {
    for capability in ALL_CAPABILITIES {
        assert_eq!(forced(capability).capability(), capability);
    }
}

#[test]
fn test_router_scalar_kernel() {
    assert_eq!(forced(Capability::Scalar).kernel(), Kernel::Scalar);
}

#[test]
fn test_router_default_uses_detection() {
    let router = Router::default();
    assert_eq!(router.capability(), crate::capability::detect());
    assert_eq!(router.config(), &RouterConfig::default());
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_router_x86_kernels() {
    assert_eq!(forced(Capability::Vector4).kernel(), Kernel::Sse2);
    let expected = if is_x86_feature_detected!("avx2") {
        Kernel::Avx2
    } else {
        Kernel::Sse2
    };
    assert_eq!(forced(Capability::Vector8).kernel(), expected);
}

#[cfg(target_arch = "aarch64")]
#[test]
fn test_router_neon_kernels() {
    assert_eq!(forced(Capability::Vector4).kernel(), Kernel::Neon);
    assert_eq!(forced(Capability::Vector8).kernel(), Kernel::Neon);
}

#[test]
fn test_router_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Router>();
    assert_send_sync::<RouterConfig>();
}

// ============================================================================
// Single-pair routing
// ============================================================================

#[test]
fn test_route_matches_decide() {
    let router = Router::default();
    for (q, w) in [(1.0, 1000.0), (10.0, 1000.0), (100.0, 1000.0), (1.0, 0.0)] {
        assert_eq!(router.route(q, w), decide(q, w, router.config()));
    }
}

#[test]
fn test_route_tie_goes_to_b() {
    assert_eq!(Router::default().route(10.0, 1000.0), BackendB);
}

#[test]
fn test_route_backend_a_disabled() {
    let router = Router::new(RouterConfig::default().with_backend_a_available(false));
    assert_eq!(router.route(0.001, 1000.0), BackendB);
}

#[test]
fn test_route_negative_query() {
    let router = Router::default();
    assert_eq!(router.route(-5.0, 1000.0), router.route(0.0, 1000.0));
}

// ============================================================================
// Batch routing
// ============================================================================

#[test]
fn test_route_batch_scenario() {
    for capability in ALL_CAPABILITIES {
        let router = forced(capability);
        let mut out = [BackendA; 3];
        router
            .route_batch(&[1.0, 100.0, 10.0], &[1000.0; 3], &mut out)
            .unwrap();
        assert_eq!(out, [BackendA, BackendB, BackendB], "{capability}");
    }
}

#[test]
fn test_route_batch_empty() {
    for capability in ALL_CAPABILITIES {
        let mut out: [Decision; 0] = [];
        assert!(forced(capability).route_batch(&[], &[], &mut out).is_ok());
    }
}

#[test]
fn test_route_batch_length_mismatch_leaves_out_untouched() {
    let router = Router::default();
    let mut out = [BackendA; 3];
    let err = router
        .route_batch(&[0.0; 4], &[1.0; 4], &mut out)
        .unwrap_err();
    assert_eq!(
        err,
        RoutingError::LengthMismatch {
            queries: 4,
            worlds: 4,
            out: 3
        }
    );
    assert_eq!(out, [BackendA; 3]);
}

#[test]
fn test_route_batch_mismatch_each_slice() {
    let router = Router::default();
    let mut out4 = [BackendB; 4];
    assert!(router.route_batch(&[0.0; 3], &[1.0; 4], &mut out4).is_err());
    assert!(router.route_batch(&[0.0; 4], &[1.0; 3], &mut out4).is_err());
}

#[test]
fn test_batch_equivalence_across_capabilities() {
    let mut rng = StdRng::seed_from_u64(0x5E10);
    let config = RouterConfig::default();

    for len in LENGTHS {
        let (queries, worlds) = random_pairs(&mut rng, len);
        let want = expected(&queries, &worlds, &config);

        for capability in ALL_CAPABILITIES {
            let router = forced(capability);
            let mut out = vec![BackendB; len];
            router.route_batch(&queries, &worlds, &mut out).unwrap();
            assert_eq!(out, want, "len={len} capability={capability}");
        }
    }
}

#[test]
fn test_batch_equivalence_with_backend_a_disabled() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = RouterConfig::default()
        .with_threshold(1.0)
        .with_backend_a_available(false);

    for capability in ALL_CAPABILITIES {
        let router = Router::new(config.with_forced_capability(Some(capability)));
        let (queries, worlds) = random_pairs(&mut rng, 37);
        let mut out = vec![BackendA; 37];
        router.route_batch(&queries, &worlds, &mut out).unwrap();
        assert!(out.iter().all(|d| *d == BackendB), "{capability}");
    }
}

#[test]
fn test_batch_special_values_every_lane_position() {
    let specials = [
        f32::NAN,
        f32::INFINITY,
        f32::NEG_INFINITY,
        -0.0,
        0.0,
        -1.0,
        f32::MIN_POSITIVE,
        f32::from_bits(1),
        f32::MAX,
    ];
    let config = RouterConfig::default().with_threshold(0.5);

    // 17 = two 8-lane chunks + a tail; move every special across every slot
    for &special in &specials {
        for pos in 0..17 {
            let mut queries = vec![0.1_f32; 17];
            let mut worlds = vec![1.0_f32; 17];
            queries[pos] = special;
            worlds[(pos + 5) % 17] = special;
            let want = expected(&queries, &worlds, &config);

            for capability in ALL_CAPABILITIES {
                let router = Router::new(config.with_forced_capability(Some(capability)));
                let mut out = vec![BackendB; 17];
                router.route_batch(&queries, &worlds, &mut out).unwrap();
                assert_eq!(out, want, "special={special} pos={pos} capability={capability}");
            }
        }
    }
}

#[test]
fn test_batch_threshold_extremes() {
    let mut rng = StdRng::seed_from_u64(99);
    let (queries, worlds) = random_pairs(&mut rng, 64);

    for threshold in [crate::config::MIN_THRESHOLD, 1.0] {
        let config = RouterConfig::default().with_threshold(threshold);
        let want = expected(&queries, &worlds, &config);
        for capability in ALL_CAPABILITIES {
            let router = Router::new(config.with_forced_capability(Some(capability)));
            let mut out = vec![BackendB; 64];
            router.route_batch(&queries, &worlds, &mut out).unwrap();
            assert_eq!(out, want, "threshold={threshold} capability={capability}");
        }
    }
}

#[test]
fn test_router_shared_across_threads() {
    let router = Router::default();
    let queries: Vec<f32> = (0..256).map(|i| i as f32).collect();
    let worlds = vec![10_000.0_f32; 256];
    let want = expected(&queries, &worlds, router.config());

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut out = vec![BackendB; 256];
                router.route_batch(&queries, &worlds, &mut out).unwrap();
                assert_eq!(out, want);
            });
        }
    });
}

// ============================================================================
// Parallel routing
// ============================================================================

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;
    use crate::router::parallel_chunk_len;

    #[test]
    fn test_parallel_chunk_len_multiple_of_width() {
        assert_eq!(parallel_chunk_len(0, 8), 8);
        assert_eq!(parallel_chunk_len(1, 8), 8);
        assert_eq!(parallel_chunk_len(8, 8), 8);
        assert_eq!(parallel_chunk_len(9, 8), 16);
        assert_eq!(parallel_chunk_len(1000, 4), 1000);
        assert_eq!(parallel_chunk_len(1001, 4), 1004);
        assert_eq!(parallel_chunk_len(5, 1), 5);
        assert_eq!(parallel_chunk_len(5, 0), 5);
    }

    #[test]
    fn test_parallel_chunk_len_saturates() {
        assert_eq!(parallel_chunk_len(usize::MAX, 8), usize::MAX);
        assert_eq!(parallel_chunk_len(usize::MAX - 2, 4), usize::MAX);
        assert_eq!(parallel_chunk_len(usize::MAX, 1), usize::MAX);
    }

    #[test]
    fn test_parallel_huge_min_chunk_routes_sequentially() {
        let queries: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let worlds = vec![1000.0_f32; 20];
        let want = expected(&queries, &worlds, &RouterConfig::default());

        for capability in ALL_CAPABILITIES {
            let router = forced(capability);
            for min_chunk in [usize::MAX, usize::MAX - 1, usize::MAX / 2 + 1] {
                let mut out = vec![BackendA; 20];
                router
                    .route_batch_parallel(&queries, &worlds, &mut out, min_chunk)
                    .unwrap();
                assert_eq!(out, want, "capability={capability} min_chunk={min_chunk}");
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = RouterConfig::default().with_threshold(0.05);

        for len in [0, 5, 63, 1000, 10_007] {
            let (queries, worlds) = random_pairs(&mut rng, len);
            for capability in ALL_CAPABILITIES {
                let router = Router::new(config.with_forced_capability(Some(capability)));
                let mut sequential = vec![BackendB; len];
                let mut parallel = vec![BackendA; len];
                router
                    .route_batch(&queries, &worlds, &mut sequential)
                    .unwrap();
                router
                    .route_batch_parallel(&queries, &worlds, &mut parallel, 100)
                    .unwrap();
                assert_eq!(parallel, sequential, "len={len} capability={capability}");
            }
        }
    }

    #[test]
    fn test_parallel_length_mismatch() {
        let router = Router::default();
        let mut out = [BackendA; 2];
        let err = router
            .route_batch_parallel(&[1.0; 3], &[1.0; 3], &mut out, 1)
            .unwrap_err();
        assert!(matches!(err, RoutingError::LengthMismatch { out: 2, .. }));
        assert_eq!(out, [BackendA; 2]);
    }
}

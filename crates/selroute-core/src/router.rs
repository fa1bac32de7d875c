//! Public routing entry point.
//!
//! A [`Router`] owns its [`RouterConfig`] by value and resolves its
//! [`Capability`] and [`Kernel`] once, at construction. Routing never mutates
//! the router, so one instance can serve many threads at once.

use crate::capability::{self, Capability};
use crate::config::RouterConfig;
use crate::decision::Decision;
use crate::error::{Result, RoutingError};
use crate::simd_native::{self, Kernel};

/// Selectivity router.
///
/// # Example
///
/// ```
/// use selroute_core::{Decision, Router, RouterConfig};
///
/// let router = Router::new(RouterConfig::default());
/// let queries = [1.0, 100.0, 10.0];
/// let worlds = [1000.0; 3];
/// let mut out = [Decision::BackendB; 3];
/// router.route_batch(&queries, &worlds, &mut out)?;
/// assert_eq!(out, [Decision::BackendA, Decision::BackendB, Decision::BackendB]);
/// # Ok::<(), selroute_core::RoutingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    config: RouterConfig,
    capability: Capability,
    kernel: Kernel,
}

impl Router {
    /// Creates a router, resolving the capability from the config override or
    /// from host detection.
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        let capability = capability::resolve(config.forced_capability());
        let kernel = Kernel::for_capability(capability);

        if capability == Capability::Vector8 && kernel != Kernel::Avx2 {
            tracing::warn!(
                kernel = %kernel,
                "8-wide routing forced on a host without AVX2, chunks run on narrower vectors"
            );
        }
        tracing::debug!(
            capability = %capability,
            kernel = %kernel,
            forced = config.forced_capability().is_some(),
            threshold = config.threshold(),
            backend_a_available = config.backend_a_available(),
            "Router initialized"
        );

        Self {
            config,
            capability,
            kernel,
        }
    }

    /// Configuration this router was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Capability resolved at construction.
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Kernel backing the resolved capability on this host.
    #[inline]
    #[must_use]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Routes a single (query, world) pair.
    #[inline]
    #[must_use]
    pub fn route(&self, query_volume: f32, world_volume: f32) -> Decision {
        simd_native::decide(query_volume, world_volume, &self.config)
    }

    /// Routes a batch into caller-provided storage.
    ///
    /// All three slices must have the same length; otherwise
    /// [`RoutingError::LengthMismatch`] is returned and `out` is left as it
    /// was. On success `out[i]` holds the decision for
    /// `(query_volumes[i], world_volumes[i])`. Never allocates.
    pub fn route_batch(
        &self,
        query_volumes: &[f32],
        world_volumes: &[f32],
        out: &mut [Decision],
    ) -> Result<()> {
        RoutingError::check_lengths(query_volumes.len(), world_volumes.len(), out.len())?;
        self.route_validated(query_volumes, world_volumes, out);
        Ok(())
    }

    #[inline]
    fn route_validated(&self, query_volumes: &[f32], world_volumes: &[f32], out: &mut [Decision]) {
        simd_native::decide_batch(
            self.kernel,
            self.capability.lanes(),
            query_volumes,
            world_volumes,
            &self.config,
            out,
        );
    }

    /// Routes a batch across the rayon pool.
    ///
    /// The batch is cut into disjoint chunks whose length is a multiple of the
    /// kernel width and at least `min_chunk`, so every chunk but the last runs
    /// entirely through the vector kernel. Output is identical to
    /// [`Router::route_batch`].
    #[cfg(feature = "parallel")]
    pub fn route_batch_parallel(
        &self,
        query_volumes: &[f32],
        world_volumes: &[f32],
        out: &mut [Decision],
        min_chunk: usize,
    ) -> Result<()> {
        use rayon::prelude::*;

        RoutingError::check_lengths(query_volumes.len(), world_volumes.len(), out.len())?;

        let len = query_volumes.len();
        let chunk = parallel_chunk_len(min_chunk.min(len), self.capability.lanes());
        if len <= chunk {
            self.route_validated(query_volumes, world_volumes, out);
            return Ok(());
        }

        query_volumes
            .par_chunks(chunk)
            .zip(world_volumes.par_chunks(chunk))
            .zip(out.par_chunks_mut(chunk))
            .for_each(|((queries, worlds), slots)| self.route_validated(queries, worlds, slots));
        Ok(())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

/// Smallest multiple of `width` that is `>= min_chunk` (and at least `width`).
///
/// Saturates at `usize::MAX` when no such multiple fits; no slice is that long,
/// so the caller then routes sequentially.
#[cfg(feature = "parallel")]
pub(crate) fn parallel_chunk_len(min_chunk: usize, width: usize) -> usize {
    let width = width.max(1);
    min_chunk
        .max(width)
        .checked_next_multiple_of(width)
        .unwrap_or(usize::MAX)
}

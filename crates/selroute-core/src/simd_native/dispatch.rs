//! Kernel selection and batch dispatch wiring.
//!
//! This module provides:
//! - `Kernel`, the concrete implementation backing a resolved [`Capability`]
//! - `decide_batch`, which splits a batch into a kernel-aligned head and a
//!   scalar tail
//! - `decide_vector8` / `decide_vector4`, fixed-width entry points

use super::scalar;
use crate::capability::Capability;
use crate::config::RouterConfig;
use crate::decision::Decision;

/// Concrete kernel chosen for a capability on the executing host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Per-element scalar rule only.
    Scalar,
    /// 256-bit AVX2 kernel, 8 lanes per step (x86_64).
    Avx2,
    /// 128-bit SSE2 kernel, 4 lanes per step (x86_64 baseline).
    Sse2,
    /// 128-bit NEON kernel, 4 lanes per step (aarch64).
    Neon,
    /// Lane-array emulation for targets without intrinsic kernels.
    Portable,
}

impl Kernel {
    /// Picks the kernel for `capability` on this host.
    ///
    /// A forced 8-wide capability on an x86_64 host without AVX2 keeps its
    /// 8-element chunking but runs each chunk as two SSE2 steps.
    #[must_use]
    pub fn for_capability(capability: Capability) -> Self {
        match capability {
            Capability::Scalar => Self::Scalar,
            Capability::Vector8 => vector8_kernel(),
            Capability::Vector4 => vector4_kernel(),
        }
    }

    /// Lowercase name for logs and tooling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Avx2 => "avx2",
            Self::Sse2 => "sse2",
            Self::Neon => "neon",
            Self::Portable => "portable",
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn vector8_kernel() -> Kernel {
    #[cfg(target_arch = "x86_64")]
    {
        // On x86_64 the host reports Vector8 exactly when AVX2 is present.
        if crate::capability::detect() == Capability::Vector8 {
            return Kernel::Avx2;
        }
        return Kernel::Sse2;
    }

    #[cfg(target_arch = "aarch64")]
    {
        return Kernel::Neon;
    }

    #[allow(unreachable_code)]
    Kernel::Portable
}

fn vector4_kernel() -> Kernel {
    #[cfg(target_arch = "x86_64")]
    {
        return Kernel::Sse2;
    }

    #[cfg(target_arch = "aarch64")]
    {
        return Kernel::Neon;
    }

    #[allow(unreachable_code)]
    Kernel::Portable
}

/// Routes a whole batch: full `width`-lane chunks through `kernel`, the
/// remaining `len % width` elements (or all of a batch shorter than `width`)
/// through the scalar rule.
///
/// Lengths must already be validated; `out[i]` always answers pair `i`.
#[inline]
pub(crate) fn decide_batch(
    kernel: Kernel,
    width: usize,
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    debug_assert!(queries.len() == worlds.len() && worlds.len() == out.len());

    let len = queries.len();
    let head = match kernel {
        Kernel::Scalar => 0,
        _ => len - len % width,
    };

    let (q_head, q_tail) = queries.split_at(head);
    let (w_head, w_tail) = worlds.split_at(head);
    let (out_head, out_tail) = out.split_at_mut(head);

    if head > 0 {
        decide_head(kernel, width, q_head, w_head, config, out_head);
    }
    scalar::decide_slice_scalar(q_tail, w_tail, config, out_tail);
}

#[cfg_attr(
    any(target_arch = "x86_64", target_arch = "aarch64"),
    allow(unused_variables) // Reason: `width` only selects the portable lane count
)]
#[inline]
fn decide_head(
    kernel: Kernel,
    width: usize,
    queries: &[f32],
    worlds: &[f32],
    config: &RouterConfig,
    out: &mut [Decision],
) {
    match kernel {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: `Kernel::Avx2` is only produced after runtime AVX2 detection,
        // and `head` is a multiple of 8.
        Kernel::Avx2 => unsafe { super::decide_chunks_avx2(queries, worlds, config, out) },
        #[cfg(target_arch = "x86_64")]
        Kernel::Sse2 => super::decide_chunks_sse2(queries, worlds, config, out),
        #[cfg(target_arch = "aarch64")]
        Kernel::Neon => super::decide_chunks_neon(queries, worlds, config, out),
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        Kernel::Portable if width == 8 => {
            scalar::decide_chunks_portable::<8>(queries, worlds, config, out);
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        Kernel::Portable => scalar::decide_chunks_portable::<4>(queries, worlds, config, out),
        _ => scalar::decide_slice_scalar(queries, worlds, config, out),
    }
}

/// Classifies exactly 8 pairs as one vector operation.
///
/// Uses the best 8-wide kernel for this host; the result always equals
/// eight calls to [`crate::decide`].
#[must_use]
pub fn decide_vector8(
    queries: &[f32; 8],
    worlds: &[f32; 8],
    config: &RouterConfig,
) -> [Decision; 8] {
    let mut out = [Decision::BackendB; 8];
    decide_batch(vector8_kernel(), 8, queries, worlds, config, &mut out);
    out
}

/// Classifies exactly 4 pairs as one vector operation.
#[must_use]
pub fn decide_vector4(
    queries: &[f32; 4],
    worlds: &[f32; 4],
    config: &RouterConfig,
) -> [Decision; 4] {
    let mut out = [Decision::BackendB; 4];
    decide_batch(vector4_kernel(), 4, queries, worlds, config, &mut out);
    out
}

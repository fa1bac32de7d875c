//! Native SIMD routing kernels.
//!
//! This module provides the scalar decision rule and its lane-wise
//! re-expressions using `core::arch` intrinsics for AVX2, SSE2 and ARM NEON.
//!
//! # Module Structure
//!
//! - `scalar` — Scalar decision rule (ground truth) and portable lane fallback
//! - `x86_avx2` — AVX2 8-lane kernel (x86_64 only)
//! - `x86_sse2` — SSE2 4-lane kernel (x86_64 only)
//! - `neon` — ARM NEON 4-lane kernel (aarch64 only)
//! - `dispatch` — Kernel selection and head/tail batch splitting
//!
//! # Lane policy
//!
//! Every kernel clamps both volumes to `>= 0`, masks zero-world lanes,
//! divides with `1.0` substituted on those lanes, compares strictly against
//! the broadcast threshold and ANDs in availability, NOT-zero-world and
//! finiteness. No lane takes a branch.
#![allow(clippy::doc_markdown)] // Contains ISA/architecture nomenclature in docs.

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe blocks in this module tree.
// - Condition 1: Loads read whole `chunks_exact(W)` chunks, so every lane is
//   in bounds.
// - Condition 2: Target-featured functions are called only after runtime feature checks
//   or on architectures where the feature is guaranteed.
// - Condition 3: Unaligned loads use `*_loadu_*`/`vld1q_*` intrinsics that permit
//   unaligned access.
// Reason: Intrinsics are required for branch-free lane classification.

pub(crate) mod scalar;

#[cfg(target_arch = "x86_64")]
mod x86_avx2;

#[cfg(target_arch = "x86_64")]
mod x86_sse2;

#[cfg(target_arch = "aarch64")]
mod neon;

// Re-export ISA kernels so dispatch.rs can access them via `super::`
#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx2::decide_chunks_avx2;

#[cfg(target_arch = "x86_64")]
pub(crate) use x86_sse2::decide_chunks_sse2;

#[cfg(target_arch = "aarch64")]
pub(crate) use neon::decide_chunks_neon;

mod dispatch;

pub(crate) use dispatch::decide_batch;
pub use dispatch::{decide_vector4, decide_vector8, Kernel};
pub use scalar::decide;

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================

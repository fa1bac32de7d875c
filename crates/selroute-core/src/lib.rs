//! # `SelRoute` Core
//!
//! Branch-free SIMD selectivity router.
//!
//! Given the expected result volume of a query and the total searchable
//! volume, `SelRoute` picks one of two execution backends: Backend A for
//! narrow, highly selective queries and Backend B for broad ones. It is a pure
//! numeric classifier; it performs no I/O and never runs the query.
//!
//! ## Features
//!
//! - **Runtime SIMD dispatch**: AVX2 (8 lanes), SSE2 / NEON (4 lanes), scalar
//! - **Exact equivalence**: every vector kernel matches the scalar rule lane for lane
//! - **Safe degenerate inputs**: zero, negative, NaN and infinite volumes route to Backend B
//! - **Zero-allocation batches** into caller-provided buffers
//!
//! ## Quick Start
//!
//! ```rust
//! use selroute_core::{Capability, Decision, Router, RouterConfig};
//!
//! let router = Router::new(RouterConfig::default().with_threshold(0.05));
//! assert_eq!(router.route(10.0, 1000.0), Decision::BackendA);
//!
//! // Pin a capability for deterministic tests
//! let scalar = Router::new(RouterConfig::default().with_forced_capability(Some(Capability::Scalar)));
//! let mut out = vec![Decision::BackendB; 3];
//! scalar.route_batch(&[1.0, 2.0, 3.0], &[10.0, 0.0, 1.0e6], &mut out)?;
//! assert_eq!(out, [Decision::BackendB, Decision::BackendB, Decision::BackendA]);
//! # Ok::<(), selroute_core::RoutingError>(())
//! ```

#![warn(missing_docs)]
// Clippy lints configured in Cargo.toml [lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::float_cmp,
        clippy::uninlined_format_args,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )
)]

pub mod capability;
pub mod config;
pub mod decision;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod policy;
pub mod router;
#[cfg(test)]
mod router_tests;
pub mod simd_native;
pub mod volume;

pub use capability::{detect, Capability};
pub use config::RouterConfig;
pub use decision::Decision;
pub use error::{ConfigError, Result, RoutingError};
pub use policy::ThresholdPolicy;
pub use router::Router;
pub use simd_native::{decide, decide_vector4, decide_vector8, Kernel};

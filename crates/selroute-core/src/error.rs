//! Error types for selroute-core.

use thiserror::Error;

/// Errors returned by batch routing.
///
/// Degenerate volumes (zero, negative, NaN, infinite) are not errors: they
/// route to [`crate::Decision::BackendB`]. The only failure is a caller
/// handing over slices of different lengths.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingError {
    /// Query, world and output slices do not share one length.
    #[error(
        "Batch length mismatch: {queries} query volumes, {worlds} world volumes, {out} output slots"
    )]
    LengthMismatch {
        /// Length of the query volume slice.
        queries: usize,
        /// Length of the world volume slice.
        worlds: usize,
        /// Length of the output slice.
        out: usize,
    },
}

impl RoutingError {
    /// Checks the batch precondition shared by every batch entry point.
    #[inline]
    pub(crate) fn check_lengths(queries: usize, worlds: usize, out: usize) -> Result<()> {
        if queries == worlds && worlds == out {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                queries,
                worlds,
                out,
            })
        }
    }
}

/// Errors raised while loading a [`crate::RouterConfig`] from files or env.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Figment could not extract a configuration (bad TOML, wrong types).
    #[error("Configuration error: {0}")]
    Extract(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

/// Result type alias for routing operations.
pub type Result<T> = std::result::Result<T, RoutingError>;

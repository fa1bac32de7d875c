//! Threshold policies applied before a [`RouterConfig`] is built.
//!
//! The base decision rule treats the threshold as a fixed value. Scaling it by
//! the number of CPU cores is an explicit, opt-in step that happens here and
//! produces an ordinary (clamped) config.

use serde::{Deserialize, Serialize};

use crate::config::{RouterConfig, DEFAULT_THRESHOLD};

/// Default core count a [`ThresholdPolicy::CoreScaled`] base threshold is
/// calibrated for.
pub const DEFAULT_REFERENCE_CORES: u32 = 8;

/// How the threshold of a new config is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Use the threshold as given.
    Fixed {
        /// Threshold value.
        threshold: f32,
    },
    /// Scale `base` linearly by `cores / reference_cores`.
    ///
    /// More CPU cores make Backend B stronger, so the boundary moves up.
    CoreScaled {
        /// Threshold at `reference_cores` cores.
        base: f32,
        /// Core count `base` was calibrated for (treated as at least 1).
        reference_cores: u32,
    },
}

impl ThresholdPolicy {
    /// Threshold for a host with `cores` cores (treated as at least 1).
    ///
    /// The value is not clamped here; [`RouterConfig::new`] does that.
    #[must_use]
    pub fn threshold_for(self, cores: u32) -> f32 {
        match self {
            Self::Fixed { threshold } => threshold,
            Self::CoreScaled {
                base,
                reference_cores,
            } => {
                let cores = f64::from(cores.max(1));
                let reference = f64::from(reference_cores.max(1));
                narrow(f64::from(base) * cores / reference)
            }
        }
    }

    /// Threshold for the executing host, using its available parallelism.
    #[must_use]
    pub fn threshold_for_host(self) -> f32 {
        self.threshold_for(host_cores())
    }

    /// Builds a config for `cores` cores with the given availability/override.
    #[must_use]
    pub fn config_for(self, cores: u32, base: RouterConfig) -> RouterConfig {
        base.with_threshold(self.threshold_for(cores))
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::Fixed {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

// Reason: thresholds live in (0, 1]; the f64 product is narrowed back to the
// f32 the config stores.
#[allow(clippy::cast_possible_truncation)]
fn narrow(value: f64) -> f32 {
    value as f32
}

/// Available parallelism of the host, 1 when it cannot be queried.
#[must_use]
pub fn host_cores() -> u32 {
    std::thread::available_parallelism()
        .ok()
        .and_then(|n| u32::try_from(n.get()).ok())
        .unwrap_or(1)
}

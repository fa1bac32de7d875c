//! Router configuration.
//!
//! [`RouterConfig`] is an immutable value object. Every constructor funnels
//! through [`RouterConfig::new`], which clamps the threshold into `(0, 1]`, so
//! a config obtained by any path always satisfies that invariant.
//!
//! Configs can be built in code or loaded with figment from (in increasing
//! priority) built-in defaults, an optional TOML file and `SELROUTE_*`
//! environment variables:
//!
//! ```toml
//! threshold = 0.02
//! backend_a_available = true
//! forced_capability = "vector4"
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::ConfigError;

/// Default selectivity boundary: below 1% of the world routes to Backend A.
pub const DEFAULT_THRESHOLD: f32 = 0.01;

/// Smallest threshold a config will hold; non-positive inputs are raised to it.
pub const MIN_THRESHOLD: f32 = f32::MIN_POSITIVE;

/// Upper bound of the threshold range.
pub const MAX_THRESHOLD: f32 = 1.0;

/// Prefix for environment overrides (`SELROUTE_THRESHOLD`, ...).
pub const ENV_PREFIX: &str = "SELROUTE_";

const CONFIG_KEYS: [&str; 3] = ["threshold", "backend_a_available", "forced_capability"];

/// Immutable routing configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterConfig {
    threshold: f32,
    backend_a_available: bool,
    forced_capability: Option<Capability>,
}

impl RouterConfig {
    /// Creates a configuration, clamping `threshold` into `(0, 1]`.
    ///
    /// Values `<= 0` and NaN become [`MIN_THRESHOLD`]; values above 1 become 1.
    #[must_use]
    pub fn new(
        threshold: f32,
        backend_a_available: bool,
        forced_capability: Option<Capability>,
    ) -> Self {
        Self {
            threshold: clamp_threshold(threshold),
            backend_a_available,
            forced_capability,
        }
    }

    /// Selectivity boundary; selectivities strictly below it route to Backend A.
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether Backend A may be selected at all.
    #[inline]
    #[must_use]
    pub fn backend_a_available(&self) -> bool {
        self.backend_a_available
    }

    /// Capability override, if any.
    #[inline]
    #[must_use]
    pub fn forced_capability(&self) -> Option<Capability> {
        self.forced_capability
    }

    /// Returns a copy with a new (clamped) threshold.
    #[must_use]
    pub fn with_threshold(self, threshold: f32) -> Self {
        Self::new(threshold, self.backend_a_available, self.forced_capability)
    }

    /// Returns a copy with Backend A availability changed.
    #[must_use]
    pub fn with_backend_a_available(self, available: bool) -> Self {
        Self {
            backend_a_available: available,
            ..self
        }
    }

    /// Returns a copy that skips detection and uses `capability` verbatim.
    #[must_use]
    pub fn with_forced_capability(self, capability: Option<Capability>) -> Self {
        Self {
            forced_capability: capability,
            ..self
        }
    }

    /// Loads a configuration from defaults, an optional TOML file and the
    /// `SELROUTE_*` environment.
    ///
    /// A missing file is not an error (figment treats it as empty).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ConfigFile::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let env = Env::prefixed(ENV_PREFIX).only(&CONFIG_KEYS);
        Self::from_figment(&figment.merge(env))
    }

    /// Extracts a configuration from an already assembled figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let file: ConfigFile = figment.extract()?;
        Ok(file.into())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, true, None)
    }
}

fn clamp_threshold(threshold: f32) -> f32 {
    let clamped = if threshold.is_nan() || threshold <= 0.0 {
        MIN_THRESHOLD
    } else if threshold > MAX_THRESHOLD {
        MAX_THRESHOLD
    } else {
        threshold
    };
    if clamped.to_bits() != threshold.to_bits() {
        tracing::warn!(
            requested = threshold,
            clamped,
            "Router threshold outside (0, 1], clamped"
        );
    }
    clamped
}

/// On-disk / environment shape of a configuration, before clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    threshold: f32,
    backend_a_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    forced_capability: Option<Capability>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            backend_a_available: true,
            forced_capability: None,
        }
    }
}

impl From<ConfigFile> for RouterConfig {
    fn from(file: ConfigFile) -> Self {
        Self::new(
            file.threshold,
            file.backend_a_available,
            file.forced_capability,
        )
    }
}

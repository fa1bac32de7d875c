//! Runtime SIMD capability detection.
//!
//! This is the only place in the crate that asks the CPU what it supports.
//! Everything else works from a resolved [`Capability`] value.

use serde::{Deserialize, Serialize};

/// Widest SIMD width usable for 32-bit float lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// No vector kernel; every element goes through the scalar rule.
    Scalar,
    /// 8 lanes per operation (AVX2 class, 256-bit).
    Vector8,
    /// 4 lanes per operation (NEON class, 128-bit).
    Vector4,
}

impl Capability {
    /// Lane count of one kernel step (1 for scalar).
    #[inline]
    #[must_use]
    pub const fn lanes(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector8 => 8,
            Self::Vector4 => 4,
        }
    }

    /// Lowercase name, matching the serde and CLI spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vector8 => "vector8",
            Self::Vector4 => "vector4",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(Self::Scalar),
            "vector8" => Ok(Self::Vector8),
            "vector4" => Ok(Self::Vector4),
            other => Err(format!(
                "unknown capability '{other}' (expected scalar, vector8 or vector4)"
            )),
        }
    }
}

/// Cached host capability - detected once at first use.
static HOST_CAPABILITY: std::sync::OnceLock<Capability> = std::sync::OnceLock::new();

fn detect_uncached() -> Capability {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return Capability::Vector8;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return Capability::Vector4;
    }

    #[allow(unreachable_code)]
    Capability::Scalar
}

/// Returns the widest capability the executing CPU supports.
///
/// x86_64 reports [`Capability::Vector8`] when AVX2 is present, ARM64 always
/// reports [`Capability::Vector4`], anything else degrades to
/// [`Capability::Scalar`].
#[inline]
#[must_use]
pub fn detect() -> Capability {
    *HOST_CAPABILITY.get_or_init(detect_uncached)
}

/// Resolves the capability a router should use: the override verbatim when
/// present, host detection otherwise.
#[inline]
#[must_use]
pub fn resolve(forced: Option<Capability>) -> Capability {
    forced.unwrap_or_else(detect)
}

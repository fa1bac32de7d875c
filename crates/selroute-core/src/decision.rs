//! Routing outcome.

use serde::{Deserialize, Serialize};

/// Backend selected for one (query, world) volume pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Narrow-result, highly parallel backend (GPU-like).
    BackendA,
    /// Broad-result, bandwidth-bound backend (CPU-like). Also the safe fallback.
    #[default]
    BackendB,
}

impl Decision {
    /// Maps a lane predicate ("route to A") onto a decision.
    #[inline]
    #[must_use]
    pub const fn from_backend_a(route_to_a: bool) -> Self {
        if route_to_a {
            Self::BackendA
        } else {
            Self::BackendB
        }
    }

    /// Returns true for [`Decision::BackendA`].
    #[inline]
    #[must_use]
    pub const fn is_backend_a(self) -> bool {
        matches!(self, Self::BackendA)
    }

    /// Short lowercase label, as printed by tooling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackendA => "backend_a",
            Self::BackendB => "backend_b",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

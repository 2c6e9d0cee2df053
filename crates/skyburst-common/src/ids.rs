//! ID types for fireworks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for firework IDs.
static FIREWORK_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for one launched firework.
///
/// Assigned by the scene coordinator when a trigger is accepted and used as
/// the key of its active set until the firework completes or is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FireworkId(u64);

impl FireworkId {
    /// Creates a new unique firework ID.
    #[must_use]
    pub fn new() -> Self {
        Self(FIREWORK_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a firework ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid firework ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) firework ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for FireworkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FireworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fw#{}", self.0)
    }
}

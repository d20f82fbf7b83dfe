//! Ledger time.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Seconds on the ledger clock.
///
/// Deadlines are timestamps too: an operation whose deadline is strictly
/// earlier than the current block time is rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The genesis time.
    pub const ZERO: Self = Self(0);

    /// A deadline that never passes.
    pub const NEVER: Self = Self(u64::MAX);

    /// Wraps a raw second count.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Raw second count.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since `earlier`; zero if `earlier` is in the future.
    #[must_use]
    pub const fn elapsed_since(&self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Moves forward by `secs`, saturating at the end of time.
    #[must_use]
    pub const fn plus(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

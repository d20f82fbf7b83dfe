//! Rounding direction for integer division.

use serde::{Deserialize, Serialize};

/// Direction in which an inexact integer quotient is rounded.
///
/// Division in this crate always names its direction.  The convention is
/// to round against the caller: outputs and share amounts round
/// [`Down`](Self::Down), required inputs round [`Up`](Self::Up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Towards positive infinity (ceiling).
    Up,
    /// Towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

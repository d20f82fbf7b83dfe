//! Error-returning arithmetic for amounts and shares.
//!
//! The domain newtypes expose `checked_*` methods returning `Option`.
//! [`CheckedArithmetic`] lifts them into [`AmmError`] results so ledger
//! and pool code can use `?` and report *which* computation failed.
//!
//! ```
//! use pairswap::domain::Amount;
//! use pairswap::math::CheckedArithmetic;
//!
//! let reserve = Amount::new(1_000);
//! assert!(reserve.safe_add(&Amount::new(1), "reserve").is_ok());
//! assert!(Amount::ZERO.safe_sub(&Amount::new(1), "reserve").is_err());
//! ```

use crate::domain::{Amount, Shares};
use crate::error::AmmError;

/// Fallible arithmetic with a caller-supplied context label.
///
/// The label ends up in [`AmmError::Overflow`] / [`AmmError::Underflow`]
/// so a failing transaction reports the quantity that broke.  Nothing
/// saturates.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] with `context` on overflow.
    fn safe_add(&self, other: &Self, context: &'static str) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] with `context` if the result would be
    /// negative.
    fn safe_sub(&self, other: &Self, context: &'static str) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self, context: &'static str) -> Result<Self, AmmError> {
        self.checked_add(other).ok_or(AmmError::Overflow(context))
    }

    #[inline]
    fn safe_sub(&self, other: &Self, context: &'static str) -> Result<Self, AmmError> {
        self.checked_sub(other).ok_or(AmmError::Underflow(context))
    }
}

impl CheckedArithmetic for Shares {
    #[inline]
    fn safe_add(&self, other: &Self, context: &'static str) -> Result<Self, AmmError> {
        self.checked_add(other).ok_or(AmmError::Overflow(context))
    }

    #[inline]
    fn safe_sub(&self, other: &Self, context: &'static str) -> Result<Self, AmmError> {
        self.checked_sub(other).ok_or(AmmError::Underflow(context))
    }
}

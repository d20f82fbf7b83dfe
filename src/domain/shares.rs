//! Liquidity share units.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;

/// A count of liquidity shares: a fungible claim on a proportional slice
/// of a pool's reserves.
///
/// Kept distinct from [`Amount`] so share counts and asset amounts cannot
/// be mixed up at a call site.  Conversions are explicit through
/// [`Shares::as_amount`] and [`Shares::from_amount`].
///
/// # Examples
///
/// ```
/// use pairswap::domain::Shares;
///
/// let minted = Shares::new(1_000);
/// assert_eq!(minted.checked_sub(&Shares::new(1_000)), Some(Shares::ZERO));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Shares(u128);

impl Shares {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw share count.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw share count.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if there are no shares.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Reinterprets the share count as an [`Amount`] for ratio math.
    pub const fn as_amount(&self) -> Amount {
        Amount::new(self.0)
    }

    /// Reinterprets an [`Amount`] computed by ratio math as shares.
    pub const fn from_amount(amount: Amount) -> Self {
        Self(amount.get())
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shares", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_ops() {
        assert_eq!(
            Shares::new(2).checked_add(&Shares::new(3)),
            Some(Shares::new(5))
        );
        assert_eq!(Shares::new(u128::MAX).checked_add(&Shares::new(1)), None);
        assert_eq!(Shares::new(1).checked_sub(&Shares::new(2)), None);
    }

    #[test]
    fn amount_round_trip_keeps_value() {
        let s = Shares::new(77);
        assert_eq!(Shares::from_amount(s.as_amount()), s);
    }

    #[test]
    fn display_has_unit() {
        assert_eq!(Shares::new(1_000).to_string(), "1000 shares");
    }
}

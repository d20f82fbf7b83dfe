//! Swap fee expressed as a ratio of integers.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// The fraction of every swap input retained by the pool.
///
/// Stored as `fee / denominator` so that pricing stays in integer
/// arithmetic.  The *input multiplier* `denominator - fee` is what the
/// pricing formulas actually use: with the default 3/1000 fee the
/// multiplier is 997/1000.
///
/// # Examples
///
/// ```
/// use pairswap::domain::FeeRatio;
///
/// let fee = FeeRatio::STANDARD;
/// assert_eq!(fee.input_multiplier(), 997);
/// assert_eq!(fee.denominator(), 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeRatio {
    fee: u32,
    denominator: u32,
}

impl FeeRatio {
    /// 0.3%: the input multiplier is 997/1000.
    pub const STANDARD: Self = Self {
        fee: 3,
        denominator: 1_000,
    };

    /// Creates a fee ratio of `fee / denominator`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the denominator is zero
    /// or the fee is not strictly below it (a 100% fee makes every swap
    /// output zero).
    pub const fn new(fee: u32, denominator: u32) -> Result<Self, AmmError> {
        if denominator == 0 {
            return Err(AmmError::InvalidConfiguration("fee denominator is zero"));
        }
        if fee >= denominator {
            return Err(AmmError::InvalidConfiguration(
                "fee must be below its denominator",
            ));
        }
        Ok(Self { fee, denominator })
    }

    /// Fee numerator.
    #[must_use]
    pub const fn fee(&self) -> u32 {
        self.fee
    }

    /// Common denominator of fee and multiplier.
    #[must_use]
    pub const fn denominator(&self) -> u32 {
        self.denominator
    }

    /// `denominator - fee`: the share of the input that moves the price.
    #[must_use]
    pub const fn input_multiplier(&self) -> u32 {
        self.denominator - self.fee
    }

    /// Re-checks the ratio after deserialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FeeRatio::new`].
    pub const fn validate(&self) -> Result<(), AmmError> {
        match Self::new(self.fee, self.denominator) {
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Default for FeeRatio {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for FeeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fee, self.denominator)
    }
}

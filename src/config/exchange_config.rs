//! Configuration shared by a factory and every pair it creates.

use serde::{Deserialize, Serialize};

use crate::domain::{FeeRatio, Shares};
use crate::error::AmmError;

/// Shares locked forever on a pair's first deposit unless configured
/// otherwise.
pub const DEFAULT_MINIMUM_LOCKED_SHARES: Shares = Shares::new(1_000);

/// Fee-growth divisor: with a fee recipient set, the protocol receives
/// `1 / divisor` of the growth in `sqrt(k)`.
pub const DEFAULT_PROTOCOL_FEE_DIVISOR: u32 = 6;

/// Immutable parameters a factory stamps onto the pairs it deploys.
///
/// # Validation
///
/// - The fee ratio must be strictly below 100%.
/// - `minimum_locked_shares` must be non-zero: the lock is what prices the
///   first share and blocks the tiny-first-deposit attack.
/// - `protocol_fee_divisor` must be at least 2.
///
/// # Examples
///
/// ```
/// use pairswap::config::ExchangeConfig;
/// use pairswap::domain::{FeeRatio, Shares};
///
/// let cfg = ExchangeConfig::new(FeeRatio::STANDARD, Shares::new(1_000), 6).expect("valid");
/// assert_eq!(cfg, ExchangeConfig::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    fee: FeeRatio,
    minimum_locked_shares: Shares,
    protocol_fee_divisor: u32,
}

impl ExchangeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if any field is out of
    /// range.
    pub fn new(
        fee: FeeRatio,
        minimum_locked_shares: Shares,
        protocol_fee_divisor: u32,
    ) -> Result<Self, AmmError> {
        let config = Self {
            fee,
            minimum_locked_shares,
            protocol_fee_divisor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every field; call after deserializing.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] naming the bad field.
    pub fn validate(&self) -> Result<(), AmmError> {
        self.fee.validate()?;
        if self.minimum_locked_shares.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum locked shares must be non-zero",
            ));
        }
        if self.protocol_fee_divisor < 2 {
            return Err(AmmError::InvalidConfiguration(
                "protocol fee divisor must be at least 2",
            ));
        }
        Ok(())
    }

    /// Swap fee charged on the input side.
    #[must_use]
    pub const fn fee(&self) -> FeeRatio {
        self.fee
    }

    /// Shares burned to [`Address::ZERO`](crate::domain::Address::ZERO) on
    /// the first deposit.
    pub const fn minimum_locked_shares(&self) -> Shares {
        self.minimum_locked_shares
    }

    /// Divisor applied to fee growth when a protocol fee recipient is set.
    #[must_use]
    pub const fn protocol_fee_divisor(&self) -> u32 {
        self.protocol_fee_divisor
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee: FeeRatio::STANDARD,
            minimum_locked_shares: DEFAULT_MINIMUM_LOCKED_SHARES,
            protocol_fee_divisor: DEFAULT_PROTOCOL_FEE_DIVISOR,
        }
    }
}

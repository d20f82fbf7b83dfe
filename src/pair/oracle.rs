//! Time-weighted average price accumulators.
//!
//! Each pair keeps two running sums of `price × seconds`, one per
//! direction, updated on the first reserve change of every block-time
//! step.  Prices are Q112.112 fixed-point: `reserve_b << 112 / reserve_a`.
//! Sums wrap modulo 2^256; consumers difference two observations, which
//! stays correct across a wrap.
//!
//! | Quantity            | Meaning                                  |
//! |---------------------|------------------------------------------|
//! | `price_a_cumulative`| Σ (B per A) × Δt                          |
//! | `price_b_cumulative`| Σ (A per B) × Δt                          |
//! | `last_update`       | block time of the last reserve update     |

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Timestamp};
use crate::math::{wide, U256};

/// Fractional bits of the accumulated prices.
pub const PRICE_RESOLUTION: usize = 112;

/// Running price sums of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceAccumulator {
    price_a_cumulative: U256,
    price_b_cumulative: U256,
    last_update: Timestamp,
}

impl PriceAccumulator {
    /// Σ price of A in B over time, Q112.112.
    #[must_use]
    pub const fn price_a_cumulative(&self) -> U256 {
        self.price_a_cumulative
    }

    /// Σ price of B in A over time, Q112.112.
    #[must_use]
    pub const fn price_b_cumulative(&self) -> U256 {
        self.price_b_cumulative
    }

    /// Block time of the last reserve update.
    #[must_use]
    pub const fn last_update(&self) -> Timestamp {
        self.last_update
    }

    /// Snapshot for later differencing.
    #[must_use]
    pub const fn observe(&self) -> PriceObservation {
        PriceObservation {
            price_a_cumulative: self.price_a_cumulative,
            price_b_cumulative: self.price_b_cumulative,
            at: self.last_update,
        }
    }

    /// Adds `price × elapsed` for the reserves that were in force since
    /// the last update, then moves the update mark to `now`.
    ///
    /// Must run before the reserves change.  Nothing accrues while either
    /// reserve is empty.
    pub fn accumulate(&mut self, reserve_a: Amount, reserve_b: Amount, now: Timestamp) {
        let elapsed = now.elapsed_since(self.last_update);
        if elapsed > 0 && !reserve_a.is_zero() && !reserve_b.is_zero() {
            let elapsed = U256::from(elapsed);
            let price_a = (wide(reserve_b.get()) << PRICE_RESOLUTION) / wide(reserve_a.get());
            let price_b = (wide(reserve_a.get()) << PRICE_RESOLUTION) / wide(reserve_b.get());
            self.price_a_cumulative = self
                .price_a_cumulative
                .overflowing_add(price_a.overflowing_mul(elapsed).0)
                .0;
            self.price_b_cumulative = self
                .price_b_cumulative
                .overflowing_add(price_b.overflowing_mul(elapsed).0)
                .0;
        }
        self.last_update = now;
    }
}

/// A point-in-time copy of a pair's accumulators.
///
/// # Examples
///
/// ```
/// use pairswap::pair::PriceObservation;
///
/// let start = PriceObservation::default();
/// assert_eq!(start.average_since(&start), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceObservation {
    #[serde(with = "u256_hex")]
    pub price_a_cumulative: U256,
    #[serde(with = "u256_hex")]
    pub price_b_cumulative: U256,
    pub at: Timestamp,
}

impl PriceObservation {
    /// Average Q112.112 prices `(A in B, B in A)` between `earlier` and
    /// `self`.  `None` when no time has passed.
    #[must_use]
    pub fn average_since(&self, earlier: &Self) -> Option<(U256, U256)> {
        let elapsed = self.at.elapsed_since(earlier.at);
        if elapsed == 0 {
            return None;
        }
        let elapsed = U256::from(elapsed);
        let delta_a = self
            .price_a_cumulative
            .overflowing_sub(earlier.price_a_cumulative)
            .0;
        let delta_b = self
            .price_b_cumulative
            .overflowing_sub(earlier.price_b_cumulative)
            .0;
        Some((delta_a / elapsed, delta_b / elapsed))
    }
}

mod u256_hex {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::math::U256;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        let digits = text.trim_start_matches("0x");
        U256::from_str_radix(digits, 16).map_err(D::Error::custom)
    }
}

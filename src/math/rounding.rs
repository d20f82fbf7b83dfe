//! Integer division with an explicit rounding direction.
//!
//! [`div_round`] is the `u128` building block behind
//! [`Amount::checked_div`](crate::domain::Amount::checked_div).  Quotients
//! are rounded against whoever receives them: outputs and minted shares
//! round down, required inputs round up.

use crate::domain::Rounding;

/// Divides `numerator` by `denominator`, rounding in the given direction.
///
/// Returns [`None`] if `denominator` is zero.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Rounding;
/// use pairswap::math::div_round;
///
/// assert_eq!(div_round(99_700_000, 1_099_700, Rounding::Down), Some(90));
/// assert_eq!(div_round(99_700_000, 1_099_700, Rounding::Up), Some(91));
/// assert_eq!(div_round(1, 0, Rounding::Up), None);
/// ```
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Some(quotient),
        // quotient + 1 cannot overflow: a remainder implies numerator < u128::MAX
        // or denominator > 1.
        Rounding::Up if numerator % denominator != 0 => Some(quotient + 1),
        Rounding::Up => Some(quotient),
    }
}

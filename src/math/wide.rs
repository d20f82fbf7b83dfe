//! 256-bit intermediates for products of reserves.
//!
//! Reserves are capped at 112 bits, so a product of two reserves scaled by
//! a fee denominator squared stays far below 2^256.  Every function here
//! still uses checked operations and reports overflow as an error.

#![allow(clippy::assign_op_pattern, clippy::manual_div_ceil)]

use uint::construct_uint;

use crate::domain::Rounding;
use crate::error::AmmError;

construct_uint! {
    /// Unsigned 256-bit integer for intermediate products.
    pub struct U256(4);
}

/// Widens a `u128` into a [`U256`].
#[must_use]
#[inline]
pub fn wide(value: u128) -> U256 {
    U256::from(value)
}

/// Narrows a [`U256`] back to `u128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if the value needs more
/// than 128 bits.
pub fn narrow(value: U256, context: &'static str) -> Result<u128, AmmError> {
    if value.bits() > 128 {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}

/// Computes `a * b / denominator` without intermediate overflow.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient exceeds `u128`.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Rounding;
/// use pairswap::math::mul_div;
///
/// assert_eq!(mul_div(u128::MAX, 2, 4, Rounding::Down), Ok(u128::MAX / 2));
/// assert_eq!(mul_div(7, 3, 2, Rounding::Up), Ok(11));
/// ```
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if denominator == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = wide(a) * wide(b);
    let d = wide(denominator);
    let mut quotient = product / d;
    if rounding.is_up() && !(product % d).is_zero() {
        quotient = quotient + U256::one();
    }
    narrow(quotient, "mul_div quotient")
}

/// Integer square root (floor) by Newton's iteration.
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    let mut x = n;
    // ceil(n / 2) without the n + 1 overflow at U256::MAX
    let mut y = (n >> 1) + (n & U256::one());
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

/// `floor(sqrt(a * b))`; always fits in `u128`.
#[must_use]
pub fn sqrt_product(a: u128, b: u128) -> u128 {
    isqrt(wide(a) * wide(b)).low_u128()
}

//! Pure pricing functions.
//!
//! All three work on integers only.  The fee is a [`FeeRatio`] `f/D`; the
//! input multiplier is `m = D − f` (997 for the standard 3/1000 fee).
//!
//! | Function             | Formula                                    | Rounding |
//! |----------------------|--------------------------------------------|----------|
//! | [`quote`]            | `a × R_b / R_a`                             | down     |
//! | [`quote_amount_out`] | `in·m·R_out / (R_in·D + in·m)`              | down     |
//! | [`quote_amount_in`]  | `R_in·out·D / ((R_out − out)·m)`            | up       |
//!
//! Rounding always favours the pool: a trader gets at most the exact
//! output and pays at least the exact input.

use crate::domain::{Amount, FeeRatio, Rounding};
use crate::error::AmmError;
use crate::math::{narrow, wide, U256};

/// Amount of B worth `amount_a` of A at the current reserve ratio.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Amount;
/// use pairswap::router::quote;
///
/// assert_eq!(
///     quote(Amount::new(500_000), Amount::new(1_000_000), Amount::new(3_600)),
///     Ok(Amount::new(1_800)),
/// );
/// ```
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    amount_a.mul_div(reserve_b, reserve_a, Rounding::Down)
}

/// Output paid by a pool for `amount_in`, after the input fee.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Amount, FeeRatio};
/// use pairswap::router::quote_amount_out;
///
/// let out = quote_amount_out(
///     Amount::new(100),
///     Amount::new(1_000),
///     Amount::new(1_000),
///     FeeRatio::STANDARD,
/// );
/// assert_eq!(out, Ok(Amount::new(90)));
/// ```
pub fn quote_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRatio,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let with_fee = wide(amount_in.get()) * U256::from(fee.input_multiplier());
    let numerator = with_fee * wide(reserve_out.get());
    let denominator = wide(reserve_in.get()) * U256::from(fee.denominator()) + with_fee;
    narrow(numerator / denominator, "amount out").map(Amount::new)
}

/// Input a pool requires to pay out exactly `amount_out`; the exact
/// ceiling of the inverse of [`quote_amount_out`].
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out` would drain `reserve_out`.
/// - [`AmmError::Overflow`] if the input does not fit in `u128`.
pub fn quote_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRatio,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = wide(reserve_in.get()) * wide(amount_out.get()) * U256::from(fee.denominator());
    let denominator =
        wide(reserve_out.get() - amount_out.get()) * U256::from(fee.input_multiplier());
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    let amount = if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    narrow(amount, "amount in").map(Amount::new)
}

//! Route resolution: pair lookup per hop and chained quotes.
//!
//! Every hop uses the fee ratio of the pair it trades against, so routes
//! may cross pairs from factories configured with different fees as long
//! as one factory resolves them all.

use super::quote::{quote_amount_in, quote_amount_out};
use crate::domain::{Address, Amount, FeeRatio, SwapPath, TokenPair};
use crate::error::AmmError;
use crate::ledger::Chain;

/// Canonical order of two assets.
///
/// # Errors
///
/// Returns [`AmmError::IdenticalAddresses`] if `x == y`.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Address;
/// use pairswap::router::sort_tokens;
///
/// let (a, b) = (Address::from_bytes([1; 32]), Address::from_bytes([2; 32]));
/// assert_eq!(sort_tokens(b, a), Ok((a, b)));
/// ```
pub fn sort_tokens(x: Address, y: Address) -> Result<(Address, Address), AmmError> {
    let tokens = TokenPair::new(x, y)?;
    Ok((tokens.token_a(), tokens.token_b()))
}

/// Registered pair for `x`/`y` under `factory`.
///
/// # Errors
///
/// - [`AmmError::PairNotFound`] if the pair was never created.
/// - [`AmmError::UnknownContract`] if `factory` is not deployed.
pub fn pair_for(
    chain: &Chain,
    factory: &Address,
    x: Address,
    y: Address,
) -> Result<Address, AmmError> {
    chain
        .factory(factory)?
        .get_pair(x, y)
        .ok_or(AmmError::PairNotFound)
}

/// `(reserve_x, reserve_y, fee)` of the `x`/`y` pair, oriented to the
/// caller's token order.
///
/// # Errors
///
/// Same as [`pair_for`].
pub fn reserves_for(
    chain: &Chain,
    factory: &Address,
    x: Address,
    y: Address,
) -> Result<(Amount, Amount, FeeRatio), AmmError> {
    let pair = chain.pair(&pair_for(chain, factory, x, y)?)?;
    let (reserve_x, reserve_y) = pair.reserves_for(&x)?;
    Ok((reserve_x, reserve_y, pair.fee()))
}

/// Amount at every step of `path` when selling `amount_in` at the start.
///
/// The first element is `amount_in`, the last is what the route pays out.
///
/// # Errors
///
/// - [`AmmError::PairNotFound`] for a hop with no pair.
/// - Any [`quote_amount_out`] error.
pub fn amounts_out(
    chain: &Chain,
    factory: &Address,
    amount_in: Amount,
    path: &SwapPath,
) -> Result<Vec<Amount>, AmmError> {
    let mut amounts = Vec::with_capacity(path.len());
    amounts.push(amount_in);
    let mut current = amount_in;
    for (input, output) in path.hops() {
        let (reserve_in, reserve_out, fee) = reserves_for(chain, factory, input, output)?;
        current = quote_amount_out(current, reserve_in, reserve_out, fee)?;
        amounts.push(current);
    }
    Ok(amounts)
}

/// Amount at every step of `path` needed to receive exactly `amount_out`
/// at the end, computed backwards.
///
/// The last element is `amount_out`, the first is the required input.
///
/// # Errors
///
/// - [`AmmError::PairNotFound`] for a hop with no pair.
/// - Any [`quote_amount_in`] error.
pub fn amounts_in(
    chain: &Chain,
    factory: &Address,
    amount_out: Amount,
    path: &SwapPath,
) -> Result<Vec<Amount>, AmmError> {
    let mut amounts = vec![Amount::ZERO; path.len()];
    let mut index = path.len() - 1;
    amounts[index] = amount_out;
    let mut current = amount_out;
    for (input, output) in path.hops().rev() {
        let (reserve_in, reserve_out, fee) = reserves_for(chain, factory, input, output)?;
        current = quote_amount_in(current, reserve_in, reserve_out, fee)?;
        index -= 1;
        amounts[index] = current;
    }
    Ok(amounts)
}

//! Stateless router over one factory's pairs.

use tracing::debug;

use super::library::{amounts_in, amounts_out, pair_for, reserves_for};
use super::quote::quote;
use super::request::{
    AddLiquidity, AddLiquidityNative, RemoveLiquidity, RemoveLiquidityNative, SwapExactIn,
    SwapExactOut,
};
use crate::domain::{Address, Amount, Deposit, Shares, SwapPath, Withdrawal};
use crate::error::AmmError;
use crate::ledger::Chain;

/// Composes multi-hop swaps and liquidity operations on top of pairs.
///
/// The router holds no state of its own beyond three addresses.  Every
/// call checks the deadline first, then runs as one transaction: a failed
/// hop or a violated bound undoes every transfer made so far.
///
/// Callers approve the router to move their tokens and pair shares; the
/// router pushes assets straight from the caller into the first pair and
/// chains each hop's output into the next pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    address: Address,
    factory: Address,
    wrapped_native: Address,
}

impl Router {
    /// A router at `address` resolving pairs through `factory`, bridging
    /// native value through the `wrapped_native` adapter.
    #[must_use]
    pub const fn new(address: Address, factory: Address, wrapped_native: Address) -> Self {
        Self {
            address,
            factory,
            wrapped_native,
        }
    }

    /// Account that must be approved for token and share pulls.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Registry used to resolve pairs.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// Wrapped-native asset used by the `*_native` calls.
    #[must_use]
    pub const fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// Quotes every step of selling `amount_in` along `path`.
    ///
    /// # Errors
    ///
    /// See [`amounts_out`](super::amounts_out).
    pub fn amounts_out(
        &self,
        chain: &Chain,
        amount_in: Amount,
        path: &SwapPath,
    ) -> Result<Vec<Amount>, AmmError> {
        amounts_out(chain, &self.factory, amount_in, path)
    }

    /// Quotes every step of buying `amount_out` along `path`.
    ///
    /// # Errors
    ///
    /// See [`amounts_in`](super::amounts_in).
    pub fn amounts_in(
        &self,
        chain: &Chain,
        amount_out: Amount,
        path: &SwapPath,
    ) -> Result<Vec<Amount>, AmmError> {
        amounts_in(chain, &self.factory, amount_out, path)
    }

    /// Deposit that fits the current `x`/`y` reserve ratio without
    /// exceeding either desired amount.
    ///
    /// An empty or missing pair accepts the desired amounts as they are.
    /// Otherwise one side is kept at its desired amount and the other is
    /// quoted from it, whichever pairing fits.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAmount`] if a desired amount is zero
    ///   against a funded pair.
    /// - [`AmmError::IdenticalAddresses`] if `x == y`.
    pub fn matched_deposit(
        &self,
        chain: &Chain,
        x: Address,
        y: Address,
        desired_x: Amount,
        desired_y: Amount,
    ) -> Result<(Amount, Amount), AmmError> {
        let (reserve_x, reserve_y) = match reserves_for(chain, &self.factory, x, y) {
            Ok((rx, ry, _)) => (rx, ry),
            Err(AmmError::PairNotFound) => (Amount::ZERO, Amount::ZERO),
            Err(e) => return Err(e),
        };
        if reserve_x.is_zero() && reserve_y.is_zero() {
            return Ok((desired_x, desired_y));
        }
        let optimal_y = quote(desired_x, reserve_x, reserve_y)?;
        if optimal_y <= desired_y {
            return Ok((desired_x, optimal_y));
        }
        let optimal_x = quote(desired_y, reserve_y, reserve_x)?;
        Ok((optimal_x.min(desired_x), desired_y))
    }

    /// Sells exactly `amount_in` of the first asset of the path.
    ///
    /// Returns the amount at every step; the last is what `recipient`
    /// received.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::PairNotFound`] if a hop has no pair.
    /// - [`AmmError::InsufficientOutputAmount`] if the final amount is
    ///   below `amount_out_min`.
    /// - [`AmmError::InsufficientAllowance`] if the router may not pull the
    ///   input.
    pub fn swap_exact_in(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &SwapExactIn,
    ) -> Result<Vec<Amount>, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let amounts = self.amounts_out(chain, request.amount_in, &request.path)?;
            ensure_min_out(&amounts, request.amount_out_min)?;
            self.pull_into_first_pair(chain, caller, &request.path, amounts[0])?;
            self.execute_hops(chain, &amounts, &request.path, request.recipient)?;
            debug!(
                %caller,
                amount_in = %request.amount_in,
                amount_out = %last(&amounts),
                hops = amounts.len() - 1,
                "swap exact in"
            );
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of the last asset of the path.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::PairNotFound`] if a hop has no pair.
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `amount_in_max`.
    pub fn swap_exact_out(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &SwapExactOut,
    ) -> Result<Vec<Amount>, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let amounts = self.amounts_in(chain, request.amount_out, &request.path)?;
            ensure_max_in(&amounts, request.amount_in_max)?;
            self.pull_into_first_pair(chain, caller, &request.path, amounts[0])?;
            self.execute_hops(chain, &amounts, &request.path, request.recipient)?;
            debug!(
                %caller,
                amount_in = %amounts[0],
                amount_out = %request.amount_out,
                "swap exact out"
            );
            Ok(amounts)
        })
    }

    /// Sells exactly `request.amount_in` of native (the value sent with
    /// the call) along a path starting at the wrapped-native asset.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if the path does not start at the
    ///   wrapped-native asset.
    /// - Same as [`Router::swap_exact_in`].
    pub fn swap_exact_native_for_tokens(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &SwapExactIn,
    ) -> Result<Vec<Amount>, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            self.ensure_starts_native(&request.path)?;
            let amounts = self.amounts_out(chain, request.amount_in, &request.path)?;
            ensure_min_out(&amounts, request.amount_out_min)?;
            self.wrap_into_first_pair(chain, caller, &request.path, amounts[0])?;
            self.execute_hops(chain, &amounts, &request.path, request.recipient)?;
            debug!(
                %caller,
                native_in = %request.amount_in,
                amount_out = %last(&amounts),
                "swap exact native for tokens"
            );
            Ok(amounts)
        })
    }

    /// Sells exactly `amount_in` tokens for native along a path ending at
    /// the wrapped-native asset.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if the path does not end at the
    ///   wrapped-native asset.
    /// - Same as [`Router::swap_exact_in`].
    pub fn swap_exact_tokens_for_native(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &SwapExactIn,
    ) -> Result<Vec<Amount>, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            self.ensure_ends_native(&request.path)?;
            let amounts = self.amounts_out(chain, request.amount_in, &request.path)?;
            ensure_min_out(&amounts, request.amount_out_min)?;
            self.pull_into_first_pair(chain, caller, &request.path, amounts[0])?;
            self.execute_hops(chain, &amounts, &request.path, self.address)?;
            self.unwrap_to(chain, last(&amounts), request.recipient)?;
            debug!(
                %caller,
                amount_in = %request.amount_in,
                native_out = %last(&amounts),
                "swap exact tokens for native"
            );
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of native with tokens.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if the path does not end at the
    ///   wrapped-native asset.
    /// - Same as [`Router::swap_exact_out`].
    pub fn swap_tokens_for_exact_native(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &SwapExactOut,
    ) -> Result<Vec<Amount>, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            self.ensure_ends_native(&request.path)?;
            let amounts = self.amounts_in(chain, request.amount_out, &request.path)?;
            ensure_max_in(&amounts, request.amount_in_max)?;
            self.pull_into_first_pair(chain, caller, &request.path, amounts[0])?;
            self.execute_hops(chain, &amounts, &request.path, self.address)?;
            self.unwrap_to(chain, request.amount_out, request.recipient)?;
            debug!(
                %caller,
                amount_in = %amounts[0],
                native_out = %request.amount_out,
                "swap tokens for exact native"
            );
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` tokens with native.  `amount_in_max` is
    /// the native value sent; only the required input is debited, so the
    /// unspent remainder stays with `caller`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if the path does not start at the
    ///   wrapped-native asset.
    /// - Same as [`Router::swap_exact_out`].
    pub fn swap_native_for_exact_tokens(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &SwapExactOut,
    ) -> Result<Vec<Amount>, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            self.ensure_starts_native(&request.path)?;
            let amounts = self.amounts_in(chain, request.amount_out, &request.path)?;
            ensure_max_in(&amounts, request.amount_in_max)?;
            self.wrap_into_first_pair(chain, caller, &request.path, amounts[0])?;
            self.execute_hops(chain, &amounts, &request.path, request.recipient)?;
            debug!(
                %caller,
                native_in = %amounts[0],
                amount_out = %request.amount_out,
                "swap native for exact tokens"
            );
            Ok(amounts)
        })
    }

    /// Deposits into a pair at its current ratio, creating the pair first
    /// when it does not exist.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::InsufficientAmount`] if a matched amount is below its
    ///   minimum.
    /// - Any [`PairMut::mint`](crate::pair::PairMut::mint) error.
    pub fn add_liquidity(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &AddLiquidity,
    ) -> Result<Deposit, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let pair = self.ensure_pair(chain, request.token_x, request.token_y)?;
            let (amount_x, amount_y) = self.matched_deposit(
                chain,
                request.token_x,
                request.token_y,
                request.desired_x,
                request.desired_y,
            )?;
            ensure_minimums(amount_x, amount_y, request.min_x, request.min_y)?;
            let assets = chain.assets_mut();
            assets.transfer_from(request.token_x, self.address, caller, pair, amount_x)?;
            assets.transfer_from(request.token_y, self.address, caller, pair, amount_y)?;
            let shares = chain.pair_mut(pair)?.mint(self.address, request.recipient)?;
            debug!(%caller, %pair, %amount_x, %amount_y, %shares, "liquidity added via router");
            Ok(Deposit {
                amount_x,
                amount_y,
                shares,
            })
        })
    }

    /// Deposits a token against native value; unmatched native is refunded
    /// to `caller`.
    ///
    /// The returned [`Deposit`] has the token in `amount_x` and native in
    /// `amount_y`.
    ///
    /// # Errors
    ///
    /// Same as [`Router::add_liquidity`].
    pub fn add_liquidity_native(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &AddLiquidityNative,
    ) -> Result<Deposit, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let pair = self.ensure_pair(chain, request.token, self.wrapped_native)?;
            let (amount_token, amount_native) = self.matched_deposit(
                chain,
                request.token,
                self.wrapped_native,
                request.desired_token,
                request.native_value,
            )?;
            ensure_minimums(amount_token, amount_native, request.min_token, request.min_native)?;
            let assets = chain.assets_mut();
            assets.transfer_native(caller, self.address, request.native_value)?;
            assets.transfer_from(request.token, self.address, caller, pair, amount_token)?;
            assets.wrap(self.wrapped_native, self.address, amount_native)?;
            assets.transfer(self.wrapped_native, self.address, pair, amount_native)?;
            let refund = request.native_value.saturating_sub(&amount_native);
            if !refund.is_zero() {
                assets.transfer_native(self.address, caller, refund)?;
            }
            let shares = chain.pair_mut(pair)?.mint(self.address, request.recipient)?;
            debug!(
                %caller, %pair, %amount_token, %amount_native, %refund, %shares,
                "native liquidity added"
            );
            Ok(Deposit {
                amount_x: amount_token,
                amount_y: amount_native,
                shares,
            })
        })
    }

    /// Redeems shares for both assets.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::InsufficientAmount`] if a payout is below its minimum.
    /// - [`AmmError::InsufficientAllowance`] if the router may not pull the
    ///   shares.
    pub fn remove_liquidity(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &RemoveLiquidity,
    ) -> Result<Withdrawal, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let withdrawal = self.burn_position(
                chain,
                caller,
                (request.token_x, request.token_y),
                request.shares,
                request.recipient,
            )?;
            let Withdrawal { amount_x, amount_y } = withdrawal;
            ensure_minimums(amount_x, amount_y, request.min_x, request.min_y)?;
            Ok(withdrawal)
        })
    }

    /// Redeems shares of a token/wrapped-native pair, paying native.
    ///
    /// The returned [`Withdrawal`] has the token in `amount_x` and native
    /// in `amount_y`.
    ///
    /// # Errors
    ///
    /// Same as [`Router::remove_liquidity`].
    pub fn remove_liquidity_native(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &RemoveLiquidityNative,
    ) -> Result<Withdrawal, AmmError> {
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let withdrawal = self.burn_position(
                chain,
                caller,
                (request.token, self.wrapped_native),
                request.shares,
                self.address,
            )?;
            let Withdrawal { amount_x, amount_y } = withdrawal;
            ensure_minimums(amount_x, amount_y, request.min_token, request.min_native)?;
            chain
                .assets_mut()
                .transfer(request.token, self.address, request.recipient, amount_x)?;
            self.unwrap_to(chain, amount_y, request.recipient)?;
            Ok(withdrawal)
        })
    }

    fn ensure_pair(&self, chain: &mut Chain, x: Address, y: Address) -> Result<Address, AmmError> {
        match pair_for(chain, &self.factory, x, y) {
            Err(AmmError::PairNotFound) => chain.factory_mut(self.factory)?.create_pair(x, y),
            found => found,
        }
    }

    fn burn_position(
        &self,
        chain: &mut Chain,
        caller: Address,
        (x, y): (Address, Address),
        shares: Shares,
        recipient: Address,
    ) -> Result<Withdrawal, AmmError> {
        let pair = pair_for(chain, &self.factory, x, y)?;
        let mut handle = chain.pair_mut(pair)?;
        handle.transfer_shares_from(self.address, caller, pair, shares)?;
        let (amount_a, amount_b) = handle.burn(self.address, recipient)?;
        let tokens = chain.pair(&pair)?.tokens();
        let (amount_x, amount_y) = tokens.orient(&x, (amount_a, amount_b))?;
        debug!(%caller, %pair, %shares, %amount_x, %amount_y, "liquidity removed via router");
        Ok(Withdrawal { amount_x, amount_y })
    }

    fn pull_into_first_pair(
        &self,
        chain: &mut Chain,
        caller: Address,
        path: &SwapPath,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let first = pair_for(chain, &self.factory, path.first(), path.as_slice()[1])?;
        chain
            .assets_mut()
            .transfer_from(path.first(), self.address, caller, first, amount)
    }

    fn wrap_into_first_pair(
        &self,
        chain: &mut Chain,
        caller: Address,
        path: &SwapPath,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let first = pair_for(chain, &self.factory, path.first(), path.as_slice()[1])?;
        let assets = chain.assets_mut();
        assets.transfer_native(caller, self.address, amount)?;
        assets.wrap(self.wrapped_native, self.address, amount)?;
        assets.transfer(self.wrapped_native, self.address, first, amount)
    }

    fn unwrap_to(
        &self,
        chain: &mut Chain,
        amount: Amount,
        recipient: Address,
    ) -> Result<(), AmmError> {
        let assets = chain.assets_mut();
        assets.unwrap(self.wrapped_native, self.address, amount)?;
        assets.transfer_native(self.address, recipient, amount)
    }

    /// Swaps hop by hop; each pair pays straight into the next pair and
    /// the last one pays `recipient`.
    fn execute_hops(
        &self,
        chain: &mut Chain,
        amounts: &[Amount],
        path: &SwapPath,
        recipient: Address,
    ) -> Result<(), AmmError> {
        let hops: Vec<(Address, Address)> = path.hops().collect();
        for (index, &(input, output)) in hops.iter().enumerate() {
            let pair = pair_for(chain, &self.factory, input, output)?;
            let to = match hops.get(index + 1) {
                Some(&(next_in, next_out)) => pair_for(chain, &self.factory, next_in, next_out)?,
                None => recipient,
            };
            let tokens = chain.pair(&pair)?.tokens();
            let (out_a, out_b) = tokens.orient(&input, (Amount::ZERO, amounts[index + 1]))?;
            chain.pair_mut(pair)?.swap(self.address, out_a, out_b, to, None)?;
        }
        Ok(())
    }

    fn ensure_starts_native(&self, path: &SwapPath) -> Result<(), AmmError> {
        if path.first() != self.wrapped_native {
            return Err(AmmError::InvalidPath("path must start at the wrapped native asset"));
        }
        Ok(())
    }

    fn ensure_ends_native(&self, path: &SwapPath) -> Result<(), AmmError> {
        if path.last() != self.wrapped_native {
            return Err(AmmError::InvalidPath("path must end at the wrapped native asset"));
        }
        Ok(())
    }
}

fn last(amounts: &[Amount]) -> Amount {
    amounts.last().copied().unwrap_or_default()
}

fn ensure_min_out(amounts: &[Amount], minimum: Amount) -> Result<(), AmmError> {
    if last(amounts) < minimum {
        return Err(AmmError::InsufficientOutputAmount);
    }
    Ok(())
}

fn ensure_max_in(amounts: &[Amount], maximum: Amount) -> Result<(), AmmError> {
    if amounts.first().copied().unwrap_or_default() > maximum {
        return Err(AmmError::ExcessiveInputAmount);
    }
    Ok(())
}

fn ensure_minimums(
    amount_x: Amount,
    amount_y: Amount,
    min_x: Amount,
    min_y: Amount,
) -> Result<(), AmmError> {
    if amount_x < min_x || amount_y < min_y {
        return Err(AmmError::InsufficientAmount);
    }
    Ok(())
}

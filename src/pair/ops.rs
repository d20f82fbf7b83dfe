//! State-changing pair entry points.
//!
//! Every entry point follows the same shape:
//!
//! 1. open a transaction ([`Chain::atomic`]),
//! 2. take the pair's reentrancy lock,
//! 3. measure deposits by diffing held balances against stored reserves,
//! 4. do the work, then resync reserves and the price accumulators.
//!
//! Callers therefore *push* assets to the pair first and call the entry
//! point second, in the same transaction; the router does exactly that.

use core::cmp;

use tracing::{debug, trace};

use super::guard;
use super::state::{Pair, MAX_RESERVE};
use crate::domain::{Address, Amount, Event, Rounding, Shares};
use crate::error::AmmError;
use crate::ledger::Chain;
use crate::math::{isqrt, narrow, sqrt_product, wide, CheckedArithmetic, U256};
use crate::traits::{FlashLoan, FlashSwap};

impl Chain {
    /// Reads a deployed pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if nothing is deployed at
    /// `address`.
    pub fn pair(&self, address: &Address) -> Result<&Pair, AmmError> {
        self.pairs.get(address).ok_or(AmmError::UnknownContract)
    }

    /// Opens a pair for state-changing calls.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if nothing is deployed at
    /// `address`.
    pub fn pair_mut(&mut self, address: Address) -> Result<PairMut<'_>, AmmError> {
        if !self.pairs.contains_key(&address) {
            return Err(AmmError::UnknownContract);
        }
        Ok(PairMut {
            chain: self,
            address,
        })
    }
}

/// Mutable handle to one pair on a [`Chain`].
///
/// # Example
///
/// ```rust
/// use pairswap::config::ExchangeConfig;
/// use pairswap::domain::{Address, Amount, Shares};
/// use pairswap::ledger::Chain;
///
/// let mut chain = Chain::new();
/// let x = chain.deploy_asset("x").expect("asset");
/// let y = chain.deploy_asset("y").expect("asset");
/// let lp = Address::from_label("lp");
/// chain.assets_mut().issue(x, lp, Amount::new(1_000)).expect("issued");
/// chain.assets_mut().issue(y, lp, Amount::new(4_000)).expect("issued");
///
/// let factory = chain.deploy_factory(lp, ExchangeConfig::default()).expect("factory");
/// let pair = chain.factory_mut(factory).expect("factory").create_pair(x, y).expect("pair");
///
/// chain.assets_mut().transfer(x, lp, pair, Amount::new(1_000)).expect("sent");
/// chain.assets_mut().transfer(y, lp, pair, Amount::new(4_000)).expect("sent");
/// let minted = chain.pair_mut(pair).expect("pair").mint(lp, lp).expect("minted");
/// assert_eq!(minted, Shares::new(1_000));
/// ```
#[derive(Debug)]
pub struct PairMut<'a> {
    chain: &'a mut Chain,
    address: Address,
}

impl PairMut<'_> {
    /// Address of the pair behind this handle.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Mints shares to `recipient` for whatever was deposited since the
    /// last reserve update.
    ///
    /// First deposit: `floor(sqrt(a × b)) − MIN`, with `MIN` shares locked
    /// at [`Address::ZERO`] forever.  Later deposits: the lesser of the two
    /// proportional claims, so an unbalanced deposit donates its excess.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if the result is zero
    ///   (or the first deposit does not exceed the lock).
    /// - [`AmmError::Overflow`] if a balance exceeds [`MAX_RESERVE`].
    /// - [`AmmError::Reentrancy`] if called from inside a flash swap.
    pub fn mint(&mut self, sender: Address, recipient: Address) -> Result<Shares, AmmError> {
        let pair = self.address;
        self.chain.atomic(|chain| {
            guard::locked(chain, pair, |chain| mint(chain, pair, sender, recipient))
        })
    }

    /// Burns every share the pair itself holds and pays the proportional
    /// slice of both reserves to `recipient`.
    ///
    /// Callers transfer shares to the pair first.  Returns `(amount_a,
    /// amount_b)` in canonical order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout is zero.
    /// - [`AmmError::Reentrancy`] if called from inside a flash swap.
    pub fn burn(
        &mut self,
        sender: Address,
        recipient: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let pair = self.address;
        self.chain.atomic(|chain| {
            guard::locked(chain, pair, |chain| burn(chain, pair, sender, recipient))
        })
    }

    /// Sends the requested outputs to `recipient`, optionally calls back a
    /// flash-swap receiver, then checks that the fee-adjusted reserve
    /// product did not fall.
    ///
    /// Inputs are whatever the pair's balances show above
    /// `reserve − output`; they may be paid before the call or, for a flash
    /// swap, inside the callback.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero or
    ///   an output is not below its reserve.
    /// - [`AmmError::InvalidRecipient`] if `recipient` is one of the tokens.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::InvariantViolation`] if the payment is too small.
    /// - [`AmmError::Reentrancy`] if the pair is already executing.
    pub fn swap(
        &mut self,
        sender: Address,
        amount_a_out: Amount,
        amount_b_out: Amount,
        recipient: Address,
        flash: Option<FlashSwap<'_>>,
    ) -> Result<(), AmmError> {
        let pair = self.address;
        let order = SwapOrder {
            sender,
            amount_a_out,
            amount_b_out,
            recipient,
        };
        self.chain
            .atomic(|chain| guard::locked(chain, pair, |chain| swap(chain, pair, &order, flash)))
    }

    /// Overwrites the reserves with the actual balances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Overflow`] if a balance exceeds [`MAX_RESERVE`].
    /// - [`AmmError::Reentrancy`] if the pair is already executing.
    pub fn sync(&mut self) -> Result<(), AmmError> {
        let pair = self.address;
        self.chain.atomic(|chain| {
            guard::locked(chain, pair, |chain| {
                let (reserve_a, reserve_b) = stored_reserves(chain, pair)?;
                let (balance_a, balance_b) = balances(chain, pair)?;
                update(chain, pair, (balance_a, balance_b), (reserve_a, reserve_b))
            })
        })
    }

    /// Sends any balance above the reserves to `to`, leaving reserves
    /// untouched.  Returns `(excess_a, excess_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Reentrancy`] if the pair is already executing.
    pub fn skim(&mut self, to: Address) -> Result<(Amount, Amount), AmmError> {
        let pair = self.address;
        self.chain.atomic(|chain| {
            guard::locked(chain, pair, |chain| {
                let (token_a, token_b) = tokens(chain, pair)?;
                let (reserve_a, reserve_b) = stored_reserves(chain, pair)?;
                let (balance_a, balance_b) = balances(chain, pair)?;
                let excess_a = balance_a.saturating_sub(&reserve_a);
                let excess_b = balance_b.saturating_sub(&reserve_b);
                send(chain, token_a, pair, to, excess_a)?;
                send(chain, token_b, pair, to, excess_b)?;
                debug!(%pair, %to, %excess_a, %excess_b, "skimmed");
                Ok((excess_a, excess_b))
            })
        })
    }

    /// Moves `shares` from `from` to `to`.  The minimum locked at
    /// [`Address::ZERO`] can never leave it.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if `from` is [`Address::ZERO`].
    /// - [`AmmError::InsufficientBalance`] if `from` holds fewer.
    pub fn transfer_shares(
        &mut self,
        from: Address,
        to: Address,
        shares: Shares,
    ) -> Result<(), AmmError> {
        let pair = self.address;
        self.chain
            .atomic(|chain| state_mut(chain, pair)?.shares.transfer(from, to, shares))
    }

    /// Lets `spender` move up to `shares` of `owner`'s position.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if the pair vanished.
    pub fn approve_shares(
        &mut self,
        owner: Address,
        spender: Address,
        shares: Shares,
    ) -> Result<(), AmmError> {
        state_mut(self.chain, self.address)?
            .shares
            .approve(owner, spender, shares);
        Ok(())
    }

    /// Moves `shares` from `from` to `to` against `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds fewer.
    pub fn transfer_shares_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        shares: Shares,
    ) -> Result<(), AmmError> {
        let pair = self.address;
        self.chain.atomic(|chain| {
            state_mut(chain, pair)?
                .shares
                .transfer_from(spender, from, to, shares)
        })
    }
}

struct SwapOrder {
    sender: Address,
    amount_a_out: Amount,
    amount_b_out: Amount,
    recipient: Address,
}

fn state(chain: &Chain, pair: Address) -> Result<&Pair, AmmError> {
    chain.pairs.get(&pair).ok_or(AmmError::UnknownContract)
}

fn state_mut(chain: &mut Chain, pair: Address) -> Result<&mut Pair, AmmError> {
    chain.pairs.get_mut(&pair).ok_or(AmmError::UnknownContract)
}

fn tokens(chain: &Chain, pair: Address) -> Result<(Address, Address), AmmError> {
    let tokens = state(chain, pair)?.tokens;
    Ok((tokens.token_a(), tokens.token_b()))
}

fn stored_reserves(chain: &Chain, pair: Address) -> Result<(Amount, Amount), AmmError> {
    let state = state(chain, pair)?;
    Ok((state.reserve_a, state.reserve_b))
}

fn balances(chain: &Chain, pair: Address) -> Result<(Amount, Amount), AmmError> {
    let (token_a, token_b) = tokens(chain, pair)?;
    let assets = chain.assets();
    Ok((assets.balance_of(&token_a, &pair), assets.balance_of(&token_b, &pair)))
}

fn send(
    chain: &mut Chain,
    token: Address,
    pair: Address,
    to: Address,
    amount: Amount,
) -> Result<(), AmmError> {
    if amount.is_zero() {
        return Ok(());
    }
    chain.assets_mut().transfer(token, pair, to, amount)
}

/// Commits new reserves after advancing the accumulators with the old
/// ones, and emits `Sync`.
fn update(
    chain: &mut Chain,
    pair: Address,
    (balance_a, balance_b): (Amount, Amount),
    (reserve_a, reserve_b): (Amount, Amount),
) -> Result<(), AmmError> {
    ensure_within_cap(balance_a, balance_b)?;
    let now = chain.now();
    let state = state_mut(chain, pair)?;
    state.oracle.accumulate(reserve_a, reserve_b, now);
    state.reserve_a = balance_a;
    state.reserve_b = balance_b;
    trace!(%pair, %balance_a, %balance_b, "reserves synced");
    chain.emit(Event::Sync {
        pair,
        reserve_a: balance_a,
        reserve_b: balance_b,
        at: now,
    });
    Ok(())
}

fn ensure_within_cap(balance_a: Amount, balance_b: Amount) -> Result<(), AmmError> {
    if balance_a > MAX_RESERVE || balance_b > MAX_RESERVE {
        return Err(AmmError::Overflow("reserve exceeds 112 bits"));
    }
    Ok(())
}

fn reserve_product(reserve_a: Amount, reserve_b: Amount) -> U256 {
    wide(reserve_a.get()) * wide(reserve_b.get())
}

/// Mints the protocol's cut of fee growth since the last liquidity event.
///
/// Returns whether the protocol fee is on.  With divisor `d`, the minted
/// amount dilutes providers by `1/d` of the growth in `sqrt(k)`.
fn accrue_protocol_fee(
    chain: &mut Chain,
    pair: Address,
    (reserve_a, reserve_b): (Amount, Amount),
) -> Result<bool, AmmError> {
    let factory = state(chain, pair)?.factory;
    let fee_to = chain.factory(&factory)?.fee_to();
    let state = state_mut(chain, pair)?;
    let Some(fee_to) = fee_to else {
        state.k_last = U256::zero();
        return Ok(false);
    };
    if state.k_last.is_zero() {
        return Ok(true);
    }
    let root_k = isqrt(reserve_product(reserve_a, reserve_b));
    let root_k_last = isqrt(state.k_last);
    if root_k <= root_k_last {
        return Ok(true);
    }
    let divisor = U256::from(state.config.protocol_fee_divisor() - 1);
    let numerator = wide(state.shares.total().get()) * (root_k - root_k_last);
    let denominator = root_k * divisor + root_k_last;
    let minted = Shares::new(narrow(numerator / denominator, "protocol fee shares")?);
    if !minted.is_zero() {
        state.shares.mint(fee_to, minted)?;
        debug!(%pair, %fee_to, %minted, "protocol fee accrued");
    }
    Ok(true)
}

fn record_k_last(chain: &mut Chain, pair: Address, fee_on: bool) -> Result<(), AmmError> {
    if fee_on {
        let state = state_mut(chain, pair)?;
        state.k_last = reserve_product(state.reserve_a, state.reserve_b);
    }
    Ok(())
}

fn mint(
    chain: &mut Chain,
    pair: Address,
    sender: Address,
    recipient: Address,
) -> Result<Shares, AmmError> {
    let reserves @ (reserve_a, reserve_b) = stored_reserves(chain, pair)?;
    let (balance_a, balance_b) = balances(chain, pair)?;
    let amount_a = balance_a.safe_sub(&reserve_a, "balance a below reserve")?;
    let amount_b = balance_b.safe_sub(&reserve_b, "balance b below reserve")?;

    let fee_on = accrue_protocol_fee(chain, pair, reserves)?;
    let state = state_mut(chain, pair)?;
    let total = state.shares.total();
    let minted = if total.is_zero() {
        let lock = state.config.minimum_locked_shares();
        let root = sqrt_product(amount_a.get(), amount_b.get());
        let minted = match root.checked_sub(lock.get()) {
            Some(m) if m > 0 => Shares::new(m),
            _ => return Err(AmmError::InsufficientLiquidityMinted),
        };
        state.shares.mint(Address::ZERO, lock)?;
        minted
    } else {
        let total = total.as_amount();
        let by_a = amount_a.mul_div(total, reserve_a, Rounding::Down)?;
        let by_b = amount_b.mul_div(total, reserve_b, Rounding::Down)?;
        Shares::from_amount(cmp::min(by_a, by_b))
    };
    if minted.is_zero() {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    state.shares.mint(recipient, minted)?;

    update(chain, pair, (balance_a, balance_b), reserves)?;
    record_k_last(chain, pair, fee_on)?;
    debug!(%pair, %recipient, %amount_a, %amount_b, %minted, "liquidity added");
    chain.emit(Event::Mint {
        pair,
        sender,
        amount_a,
        amount_b,
    });
    Ok(minted)
}

fn burn(
    chain: &mut Chain,
    pair: Address,
    sender: Address,
    recipient: Address,
) -> Result<(Amount, Amount), AmmError> {
    let (token_a, token_b) = tokens(chain, pair)?;
    let reserves @ (reserve_a, reserve_b) = stored_reserves(chain, pair)?;
    let burned = state(chain, pair)?.shares.balance_of(&pair);
    if burned.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }

    let fee_on = accrue_protocol_fee(chain, pair, reserves)?;
    let state = state_mut(chain, pair)?;
    let total = state.shares.total().as_amount();
    let amount_a = burned.as_amount().mul_div(reserve_a, total, Rounding::Down)?;
    let amount_b = burned.as_amount().mul_div(reserve_b, total, Rounding::Down)?;
    if amount_a.is_zero() || amount_b.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    state.shares.burn(pair, burned)?;

    send(chain, token_a, pair, recipient, amount_a)?;
    send(chain, token_b, pair, recipient, amount_b)?;
    let balances = balances(chain, pair)?;
    update(chain, pair, balances, reserves)?;
    record_k_last(chain, pair, fee_on)?;
    debug!(%pair, %recipient, %burned, %amount_a, %amount_b, "liquidity removed");
    chain.emit(Event::Burn {
        pair,
        sender,
        amount_a,
        amount_b,
        recipient,
    });
    Ok((amount_a, amount_b))
}

fn swap(
    chain: &mut Chain,
    pair: Address,
    order: &SwapOrder,
    flash: Option<FlashSwap<'_>>,
) -> Result<(), AmmError> {
    let SwapOrder {
        sender,
        amount_a_out,
        amount_b_out,
        recipient,
    } = *order;
    if amount_a_out.is_zero() && amount_b_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    let reserves @ (reserve_a, reserve_b) = stored_reserves(chain, pair)?;
    if amount_a_out >= reserve_a && !amount_a_out.is_zero()
        || amount_b_out >= reserve_b && !amount_b_out.is_zero()
    {
        return Err(AmmError::InsufficientOutputAmount);
    }
    let (token_a, token_b) = tokens(chain, pair)?;
    if recipient == token_a || recipient == token_b {
        return Err(AmmError::InvalidRecipient);
    }

    send(chain, token_a, pair, recipient, amount_a_out)?;
    send(chain, token_b, pair, recipient, amount_b_out)?;
    if let Some(FlashSwap { callee, data }) = flash {
        trace!(%pair, %recipient, "flash swap callback");
        let loan = FlashLoan {
            pair,
            sender,
            amount_a_out,
            amount_b_out,
            data,
        };
        callee.on_flash_swap(chain, &loan)?;
    }

    let (balance_a, balance_b) = balances(chain, pair)?;
    let amount_a_in = amount_in(balance_a, reserve_a, amount_a_out);
    let amount_b_in = amount_in(balance_b, reserve_b, amount_b_out);
    if amount_a_in.is_zero() && amount_b_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }

    ensure_within_cap(balance_a, balance_b)?;
    let fee = state(chain, pair)?.config.fee();
    let scale = wide(u128::from(fee.denominator()));
    let fee_part = wide(u128::from(fee.fee()));
    let adjusted = |balance: Amount, paid: Amount| {
        (wide(balance.get()) * scale)
            .checked_sub(wide(paid.get()) * fee_part)
            .ok_or(AmmError::Underflow("fee exceeds balance"))
    };
    let adjusted_a = adjusted(balance_a, amount_a_in)?;
    let adjusted_b = adjusted(balance_b, amount_b_in)?;
    let overflow = || AmmError::Overflow("invariant product");
    let after = adjusted_a.checked_mul(adjusted_b).ok_or_else(overflow)?;
    let before = reserve_product(reserve_a, reserve_b)
        .checked_mul(scale * scale)
        .ok_or_else(overflow)?;
    if after < before {
        return Err(AmmError::InvariantViolation);
    }

    update(chain, pair, (balance_a, balance_b), reserves)?;
    debug!(
        %pair, %sender, %recipient,
        %amount_a_in, %amount_b_in, %amount_a_out, %amount_b_out,
        "swapped"
    );
    chain.emit(Event::Swap {
        pair,
        sender,
        amount_a_in,
        amount_b_in,
        amount_a_out,
        amount_b_out,
        recipient,
    });
    Ok(())
}

/// What arrived on one side: balance above `reserve − out`.
fn amount_in(balance: Amount, reserve: Amount, out: Amount) -> Amount {
    balance.saturating_sub(&reserve.saturating_sub(&out))
}

//! The previous exchange generation: one pool per token, priced against
//! the native asset.
//!
//! Reserves are not stored.  The token reserve is the exchange's token
//! balance and the native reserve is its native balance, so anything sent
//! to the exchange address joins the pool.

use tracing::{debug, info};

use crate::domain::{Address, Amount, Event, Rounding, Shares, Timestamp, Withdrawal};
use crate::error::AmmError;
use crate::ledger::{Chain, ShareLedger};
use crate::math::CheckedArithmetic;

/// A single-token pool paired with the native asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyExchange {
    address: Address,
    token: Address,
    shares: ShareLedger,
}

impl LegacyExchange {
    /// Address of the exchange.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The token this exchange trades against native.
    #[must_use]
    pub const fn token(&self) -> Address {
        self.token
    }

    /// `(token reserve, native reserve)` as held on `chain`.
    #[must_use]
    pub fn reserves(&self, chain: &Chain) -> (Amount, Amount) {
        let assets = chain.assets();
        (
            assets.balance_of(&self.token, &self.address),
            assets.native_balance(&self.address),
        )
    }

    /// Outstanding shares.
    #[must_use]
    pub fn total_shares(&self) -> Shares {
        self.shares.total()
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn share_balance_of(&self, owner: &Address) -> Shares {
        self.shares.balance_of(owner)
    }

    /// Shares `spender` may move out of `owner`.
    #[must_use]
    pub fn share_allowance(&self, owner: &Address, spender: &Address) -> Shares {
        self.shares.allowance(owner, spender)
    }
}

impl Chain {
    /// Deploys the legacy exchange for `token` and records it in the
    /// legacy registry.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownAsset`] if `token` is not registered.
    /// - [`AmmError::ExchangeExists`] if `token` already has one.
    pub fn deploy_legacy_exchange(&mut self, token: Address) -> Result<Address, AmmError> {
        if !self.assets().is_registered(&token) {
            return Err(AmmError::UnknownAsset);
        }
        if self.legacy_registry.contains_key(&token) {
            return Err(AmmError::ExchangeExists);
        }
        let address = self.next_deployment(b"legacy-exchange");
        self.legacy_exchanges.insert(
            address,
            LegacyExchange {
                address,
                token,
                shares: ShareLedger::default(),
            },
        );
        self.legacy_registry.insert(token, address);
        info!(%token, exchange = %address, "legacy exchange deployed");
        Ok(address)
    }

    /// The legacy exchange registered for `token`, if any.
    #[must_use]
    pub fn legacy_exchange_for(&self, token: &Address) -> Option<Address> {
        self.legacy_registry.get(token).copied()
    }

    /// Reads a deployed legacy exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if nothing is deployed at
    /// `address`.
    pub fn legacy_exchange(&self, address: &Address) -> Result<&LegacyExchange, AmmError> {
        self.legacy_exchanges
            .get(address)
            .ok_or(AmmError::UnknownContract)
    }

    /// Opens a legacy exchange for state-changing calls.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if nothing is deployed at
    /// `address`.
    pub fn legacy_exchange_mut(
        &mut self,
        address: Address,
    ) -> Result<LegacyExchangeMut<'_>, AmmError> {
        if !self.legacy_exchanges.contains_key(&address) {
            return Err(AmmError::UnknownContract);
        }
        Ok(LegacyExchangeMut {
            chain: self,
            address,
        })
    }
}

/// Mutable handle to one legacy exchange on a [`Chain`].
#[derive(Debug)]
pub struct LegacyExchangeMut<'a> {
    chain: &'a mut Chain,
    address: Address,
}

impl LegacyExchangeMut<'_> {
    /// Deposits `native_value` plus the matching token amount from
    /// `provider` and mints shares to them.
    ///
    /// The first deposit takes `max_tokens` and mints shares equal to
    /// `native_value`.  Later deposits take
    /// `native_value × token_reserve / native_reserve + 1` tokens and mint
    /// `native_value × total / native_reserve` shares.  The exchange pulls
    /// the tokens, so `provider` approves it first.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::InsufficientAmount`] for zero native value or tokens.
    /// - [`AmmError::ExcessiveInputAmount`] if the token amount exceeds
    ///   `max_tokens`.
    /// - [`AmmError::InsufficientLiquidityMinted`] below `min_shares`.
    pub fn add_liquidity(
        &mut self,
        provider: Address,
        native_value: Amount,
        min_shares: Shares,
        max_tokens: Amount,
        deadline: Timestamp,
    ) -> Result<Shares, AmmError> {
        let exchange = self.address;
        self.chain.atomic(|chain| {
            chain.ensure_deadline(deadline)?;
            if native_value.is_zero() || max_tokens.is_zero() {
                return Err(AmmError::InsufficientAmount);
            }
            let state = chain.legacy_exchange(&exchange)?;
            let token = state.token;
            let total = state.total_shares().as_amount();
            let (token_reserve, native_reserve) = state.reserves(chain);

            let (amount_token, minted) = if total.is_zero() {
                (max_tokens, Shares::from_amount(native_value))
            } else {
                let amount_token = native_value
                    .mul_div(token_reserve, native_reserve, Rounding::Down)?
                    .safe_add(&Amount::new(1), "legacy token deposit")?;
                let minted = native_value.mul_div(total, native_reserve, Rounding::Down)?;
                (amount_token, Shares::from_amount(minted))
            };
            if amount_token > max_tokens {
                return Err(AmmError::ExcessiveInputAmount);
            }
            if minted.is_zero() || minted < min_shares {
                return Err(AmmError::InsufficientLiquidityMinted);
            }

            let assets = chain.assets_mut();
            assets.transfer_native(provider, exchange, native_value)?;
            assets.transfer_from(token, exchange, provider, exchange, amount_token)?;
            state_mut(chain, exchange)?.shares.mint(provider, minted)?;
            debug!(%exchange, %provider, %native_value, %amount_token, %minted, "legacy deposit");
            chain.emit(Event::LegacyDeposit {
                exchange,
                provider,
                amount_token,
                amount_native: native_value,
            });
            Ok(minted)
        })
    }

    /// Burns `shares` of `owner` and pays the pro-rata token and native
    /// amounts to them.
    ///
    /// Returns `amount_x` in the token and `amount_y` in native.
    ///
    /// # Errors
    ///
    /// - [`AmmError::EmptyPosition`] for zero shares or an empty pool.
    /// - [`AmmError::InsufficientBalance`] if `owner` holds fewer shares.
    pub fn withdraw(&mut self, owner: Address, shares: Shares) -> Result<Withdrawal, AmmError> {
        let exchange = self.address;
        self.chain.atomic(|chain| {
            let state = chain.legacy_exchange(&exchange)?;
            let total = state.total_shares().as_amount();
            if shares.is_zero() || total.is_zero() {
                return Err(AmmError::EmptyPosition);
            }
            let token = state.token;
            let (token_reserve, native_reserve) = state.reserves(chain);
            let amount_token = shares.as_amount().mul_div(token_reserve, total, Rounding::Down)?;
            let amount_native = shares
                .as_amount()
                .mul_div(native_reserve, total, Rounding::Down)?;

            state_mut(chain, exchange)?.shares.burn(owner, shares)?;
            let assets = chain.assets_mut();
            assets.transfer(token, exchange, owner, amount_token)?;
            assets.transfer_native(exchange, owner, amount_native)?;
            debug!(%exchange, %owner, %shares, %amount_token, %amount_native, "legacy withdrawal");
            chain.emit(Event::LegacyWithdrawal {
                exchange,
                owner,
                amount_token,
                amount_native,
            });
            Ok(Withdrawal {
                amount_x: amount_token,
                amount_y: amount_native,
            })
        })
    }

    /// Sets `spender`'s allowance over `owner`'s shares.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if the exchange vanished.
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

    /// Moves `owner`'s shares using `spender`'s allowance.
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
        let exchange = self.address;
        self.chain.atomic(|chain| {
            state_mut(chain, exchange)?
                .shares
                .transfer_from(spender, from, to, shares)
        })
    }
}

fn state_mut(chain: &mut Chain, exchange: Address) -> Result<&mut LegacyExchange, AmmError> {
    chain
        .legacy_exchanges
        .get_mut(&exchange)
        .ok_or(AmmError::UnknownContract)
}

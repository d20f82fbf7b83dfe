//! [`LiquiditySource`] adapters over the two exchange generations.

use tracing::debug;

use crate::domain::{Address, Shares, Withdrawal};
use crate::error::AmmError;
use crate::ledger::Chain;
use crate::router::pair_for;
use crate::traits::LiquiditySource;

/// A position in the legacy exchange of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySource {
    exchange: Address,
    token: Address,
}

impl LegacySource {
    /// Resolves the legacy exchange registered for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if `token` has none.
    pub fn for_token(chain: &Chain, token: Address) -> Result<Self, AmmError> {
        let exchange = chain
            .legacy_exchange_for(&token)
            .ok_or(AmmError::UnknownContract)?;
        Ok(Self { exchange, token })
    }

    /// Address of the wrapped exchange.
    #[must_use]
    pub const fn exchange(&self) -> Address {
        self.exchange
    }
}

impl LiquiditySource for LegacySource {
    fn token(&self) -> Address {
        self.token
    }

    fn position_of(&self, chain: &Chain, owner: &Address) -> Result<Shares, AmmError> {
        Ok(chain.legacy_exchange(&self.exchange)?.share_balance_of(owner))
    }

    fn withdraw_position(
        &self,
        chain: &mut Chain,
        owner: Address,
        operator: Address,
    ) -> Result<Withdrawal, AmmError> {
        let shares = self.position_of(chain, &owner)?;
        if shares.is_zero() {
            return Err(AmmError::EmptyPosition);
        }
        let exchange = self.exchange;
        chain.atomic(|chain| {
            let mut handle = chain.legacy_exchange_mut(exchange)?;
            handle.transfer_shares_from(operator, owner, operator, shares)?;
            let withdrawal = handle.withdraw(operator, shares)?;
            debug!(%exchange, %owner, %shares, "legacy position redeemed");
            Ok(withdrawal)
        })
    }
}

/// A position in a current-generation `token`/wrapped-native pair.
///
/// Lets a position move between factories, e.g. from one configured with
/// a different fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSource {
    pair: Address,
    token: Address,
    wrapped_native: Address,
}

impl PairSource {
    /// Resolves `factory`'s pair for `token` and `wrapped_native`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PairNotFound`] if the factory has no such pair.
    pub fn new(
        chain: &Chain,
        factory: &Address,
        token: Address,
        wrapped_native: Address,
    ) -> Result<Self, AmmError> {
        let pair = pair_for(chain, factory, token, wrapped_native)?;
        Ok(Self {
            pair,
            token,
            wrapped_native,
        })
    }

    /// Address of the wrapped pair.
    #[must_use]
    pub const fn pair(&self) -> Address {
        self.pair
    }
}

impl LiquiditySource for PairSource {
    fn token(&self) -> Address {
        self.token
    }

    fn position_of(&self, chain: &Chain, owner: &Address) -> Result<Shares, AmmError> {
        Ok(chain.pair(&self.pair)?.share_balance_of(owner))
    }

    fn withdraw_position(
        &self,
        chain: &mut Chain,
        owner: Address,
        operator: Address,
    ) -> Result<Withdrawal, AmmError> {
        let shares = self.position_of(chain, &owner)?;
        if shares.is_zero() {
            return Err(AmmError::EmptyPosition);
        }
        let pair = self.pair;
        chain.atomic(|chain| {
            let mut handle = chain.pair_mut(pair)?;
            handle.transfer_shares_from(operator, owner, pair, shares)?;
            let payout = handle.burn(operator, operator)?;
            let tokens = chain.pair(&pair)?.tokens();
            let (amount_token, amount_native) = tokens.orient(&self.token, payout)?;
            chain
                .assets_mut()
                .unwrap(self.wrapped_native, operator, amount_native)?;
            debug!(%pair, %owner, %shares, "pair position redeemed");
            Ok(Withdrawal {
                amount_x: amount_token,
                amount_y: amount_native,
            })
        })
    }
}

//! Moves a token/native position into the current exchange.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::sources::LegacySource;
use crate::domain::{Address, Amount, Event, Shares, Timestamp};
use crate::error::AmmError;
use crate::ledger::Chain;
use crate::router::{pair_for, AddLiquidityNative, Router};
use crate::traits::LiquiditySource;

/// Limits for one migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRequest {
    /// The token side of the position; the other side is native.
    pub token: Address,
    /// Smallest token amount that must land in the new pair.
    pub min_token: Amount,
    /// Smallest native amount that must land in the new pair.
    pub min_native: Amount,
    /// Receives the new pair shares.
    pub recipient: Address,
    pub deadline: Timestamp,
}

/// What a migration deposited and what it handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigrationReceipt {
    pub pair: Address,
    pub deposited_token: Amount,
    pub deposited_native: Amount,
    pub shares: Shares,
    pub refunded_token: Amount,
    pub refunded_native: Amount,
}

/// One-shot adapter from an old position to a current pair.
///
/// Holds no state: a position cannot be migrated twice because the first
/// migration redeems all of it, and a second attempt finds nothing to
/// redeem ([`AmmError::EmptyPosition`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migrator {
    address: Address,
    router: Router,
}

impl Migrator {
    #[must_use]
    pub const fn new(address: Address, router: Router) -> Self {
        Self { address, router }
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub const fn router(&self) -> Router {
        self.router
    }

    /// Migrates the caller's whole legacy position in `request.token`.
    ///
    /// The caller approves the migrator for their legacy shares first.
    /// The redeemed assets are matched to the current pair's ratio (the
    /// pair is created if missing), deposited through the router with
    /// `request.recipient` as share owner, and whatever did not match is
    /// refunded to the caller.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::UnknownContract`] if the token has no legacy exchange.
    /// - [`AmmError::EmptyPosition`] if the caller holds no legacy shares.
    /// - [`AmmError::InsufficientAllowance`] without a share approval.
    /// - [`AmmError::InsufficientXAmount`] / [`AmmError::InsufficientNativeAmount`]
    ///   if the matched deposit falls below the request's minimums.
    pub fn migrate(
        &self,
        chain: &mut Chain,
        caller: Address,
        request: &MigrationRequest,
    ) -> Result<MigrationReceipt, AmmError> {
        chain.ensure_deadline(request.deadline)?;
        let source = LegacySource::for_token(chain, request.token)?;
        self.migrate_from(chain, caller, &source, request)
    }

    /// Same as [`Migrator::migrate`] for any [`LiquiditySource`].
    ///
    /// # Errors
    ///
    /// As [`Migrator::migrate`], plus [`AmmError::InvalidPath`] if the
    /// source pays out a token other than `request.token`.
    pub fn migrate_from<S>(
        &self,
        chain: &mut Chain,
        caller: Address,
        source: &S,
        request: &MigrationRequest,
    ) -> Result<MigrationReceipt, AmmError>
    where
        S: LiquiditySource + ?Sized,
    {
        if source.token() != request.token {
            return Err(AmmError::InvalidPath("source does not pay out the requested token"));
        }
        chain.atomic(|chain| {
            chain.ensure_deadline(request.deadline)?;
            let token = request.token;
            let withdrawal = source.withdraw_position(chain, caller, self.address)?;
            let (amount_token, amount_native) = (withdrawal.amount_x, withdrawal.amount_y);

            let (matched_token, matched_native) = self.router.matched_deposit(
                chain,
                token,
                self.router.wrapped_native(),
                amount_token,
                amount_native,
            )?;
            if matched_token < request.min_token {
                return Err(AmmError::InsufficientXAmount);
            }
            if matched_native < request.min_native {
                return Err(AmmError::InsufficientNativeAmount);
            }

            let router = self.router.address();
            chain
                .assets_mut()
                .approve(token, self.address, router, amount_token)?;
            let deposit = self.router.add_liquidity_native(
                chain,
                self.address,
                &AddLiquidityNative {
                    token,
                    desired_token: amount_token,
                    native_value: amount_native,
                    min_token: request.min_token,
                    min_native: request.min_native,
                    recipient: request.recipient,
                    deadline: request.deadline,
                },
            )?;

            let refunded_token = amount_token.saturating_sub(&deposit.amount_x);
            let refunded_native = amount_native.saturating_sub(&deposit.amount_y);
            let assets = chain.assets_mut();
            assets.approve(token, self.address, router, Amount::ZERO)?;
            if !refunded_token.is_zero() {
                assets.transfer(token, self.address, caller, refunded_token)?;
            }
            if !refunded_native.is_zero() {
                assets.transfer_native(self.address, caller, refunded_native)?;
            }

            let native = self.router.wrapped_native();
            let pair = pair_for(chain, &self.router.factory(), token, native)?;
            info!(
                migrator = %self.address, %caller, %token, %pair,
                deposited_token = %deposit.amount_x, deposited_native = %deposit.amount_y,
                %refunded_token, %refunded_native, "position migrated"
            );
            chain.emit(Event::Migrated {
                migrator: self.address,
                owner: caller,
                token,
                amount_token: deposit.amount_x,
                amount_native: deposit.amount_y,
                recipient: request.recipient,
            });
            Ok(MigrationReceipt {
                pair,
                deposited_token: deposit.amount_x,
                deposited_native: deposit.amount_y,
                shares: deposit.shares,
                refunded_token,
                refunded_native,
            })
        })
    }
}

//! Capability shared by exchange versions whose positions can be migrated.
//!
//! The legacy exchange and current pairs expose different withdrawal
//! interfaces (single shares-for-native pool vs. two-token pair).  The
//! migrator only needs one thing from either: "redeem this owner's whole
//! position and tell me what came out".  [`LiquiditySource`] is that
//! capability; `migrator::LegacySource` and `migrator::PairSource`
//! adapt the two versions to it.

use crate::domain::{Address, Shares, Withdrawal};
use crate::error::AmmError;
use crate::ledger::Chain;

/// A position that pays out one fungible token plus the native asset.
pub trait LiquiditySource {
    /// The fungible token side of the position.
    fn token(&self) -> Address;

    /// Shares `owner` currently holds in the source.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownContract`] if the source is not deployed.
    fn position_of(&self, chain: &Chain, owner: &Address) -> Result<Shares, AmmError>;

    /// Pulls all of `owner`'s shares into `operator` (which must hold an
    /// allowance) and redeems them.  The payout lands at `operator`:
    /// `amount_x` in [`LiquiditySource::token`], `amount_y` in native.
    ///
    /// # Errors
    ///
    /// - [`AmmError::EmptyPosition`] if `owner` holds no shares.
    /// - [`AmmError::InsufficientAllowance`] if `operator` was not approved.
    fn withdraw_position(
        &self,
        chain: &mut Chain,
        owner: Address,
        operator: Address,
    ) -> Result<Withdrawal, AmmError>;
}

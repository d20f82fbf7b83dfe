//! Share ledger for liquidity positions.

use super::Book;
use crate::domain::{Address, Shares};
use crate::error::AmmError;

/// Fungible liquidity shares issued by a pool.
///
/// A typed view over a [`Book`]: same balance, allowance and supply rules,
/// but denominated in [`Shares`] so share counts cannot be confused with
/// asset amounts.  Shares parked at [`Address::ZERO`] are locked for good:
/// neither transfer path moves them out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger(Book);

impl ShareLedger {
    /// Shares held by `holder`.
    pub fn balance_of(&self, holder: &Address) -> Shares {
        Shares::from_amount(self.0.balance_of(holder))
    }

    /// Outstanding shares across all holders, locked ones included.
    pub fn total(&self) -> Shares {
        Shares::from_amount(self.0.total_supply())
    }

    /// Shares `spender` may still move out of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Shares {
        Shares::from_amount(self.0.allowance(owner, spender))
    }

    /// Sets `spender`'s allowance over `owner`'s shares.
    pub fn approve(&mut self, owner: Address, spender: Address, shares: Shares) {
        self.0.approve(owner, spender, shares.as_amount());
    }

    /// Issues new shares.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if supply overflows.
    pub fn mint(&mut self, to: Address, shares: Shares) -> Result<(), AmmError> {
        self.0.mint(to, shares.as_amount())
    }

    /// Cancels shares held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds fewer.
    pub fn burn(&mut self, from: Address, shares: Shares) -> Result<(), AmmError> {
        self.0.burn(from, shares.as_amount())
    }

    /// Moves shares between holders.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if `from` is the [`Address::ZERO`] sink.
    /// - [`AmmError::InsufficientBalance`] if `from` holds fewer.
    pub fn transfer(&mut self, from: Address, to: Address, shares: Shares) -> Result<(), AmmError> {
        ensure_not_sink(&from)?;
        self.0.transfer(from, to, shares.as_amount())
    }

    /// Moves shares using `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if `from` is the [`Address::ZERO`] sink.
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds fewer.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        shares: Shares,
    ) -> Result<(), AmmError> {
        ensure_not_sink(&from)?;
        self.0.transfer_from(spender, from, to, shares.as_amount())
    }
}

fn ensure_not_sink(from: &Address) -> Result<(), AmmError> {
    if from.is_zero() {
        return Err(AmmError::Forbidden);
    }
    Ok(())
}

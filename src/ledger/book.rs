//! Balance and allowance book for one fungible unit.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balances, allowances and supply of a single fungible asset.
///
/// Used for every registered asset in the [`AssetLedger`](super::AssetLedger)
/// and, through thin wrappers, for pair and legacy-exchange shares.
/// An allowance of [`Amount::MAX`] is treated as unlimited and is never
/// decremented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl Book {
    /// Balance held by `holder`.
    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    /// Sum of all balances.
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Remaining delegated amount `spender` may move out of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Sets (not increments) the allowance of `spender` over `owner`.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Creates `amount` new units for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if supply or balance overflows.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.total_supply = self.total_supply.safe_add(&amount, "total supply")?;
        let balance = self.balance_of(&to).safe_add(&amount, "balance credit")?;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Destroys `amount` units held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn burn(&mut self, from: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.total_supply = self.total_supply.safe_sub(&amount, "total supply")?;
        self.set_balance(from, balance);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let debited = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.set_balance(from, debited);
        let credited = self.balance_of(&to).safe_add(&amount, "balance credit")?;
        self.set_balance(to, credited);
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`,
    /// consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if spender != from {
            let allowance = self.allowance(&from, &spender);
            if allowance != Amount::MAX {
                let remaining = allowance
                    .checked_sub(&amount)
                    .ok_or(AmmError::InsufficientAllowance)?;
                self.approve(from, spender, remaining);
            }
        }
        self.transfer(from, to, amount)
    }

    fn set_balance(&mut self, holder: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&holder);
        } else {
            self.balances.insert(holder, amount);
        }
    }
}

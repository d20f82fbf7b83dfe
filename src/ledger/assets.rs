//! Fungible assets, the native asset and the wrapped-native adapter.
//!
//! Pairs never receive assets through their own entry points: callers move
//! assets with [`AssetLedger::transfer`] / [`AssetLedger::transfer_from`]
//! first, and the pair measures what arrived by diffing its balance
//! against its last recorded reserve.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::Book;
use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balances of every registered asset plus native balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetLedger {
    books: BTreeMap<Address, Book>,
    native: BTreeMap<Address, Amount>,
    wrappers: BTreeSet<Address>,
}

impl AssetLedger {
    /// Registers a new fungible asset with zero supply.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the asset already
    /// exists or `asset` is the zero address.
    pub fn register(&mut self, asset: Address) -> Result<(), AmmError> {
        if asset.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "zero address cannot be an asset",
            ));
        }
        if self.books.contains_key(&asset) {
            return Err(AmmError::InvalidConfiguration("asset already registered"));
        }
        self.books.insert(asset, Book::default());
        Ok(())
    }

    /// Returns `true` if `asset` is registered.
    #[must_use]
    pub fn is_registered(&self, asset: &Address) -> bool {
        self.books.contains_key(asset)
    }

    /// Returns `true` if `asset` is a wrapped-native adapter.
    #[must_use]
    pub fn is_wrapped_native(&self, asset: &Address) -> bool {
        self.wrappers.contains(asset)
    }

    /// Creates new supply of `asset` for `to` (genesis allocation).
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownAsset`] if `asset` is not registered.
    /// - [`AmmError::Forbidden`] for wrapped-native assets, whose supply is
    ///   backed by native deposits only.
    pub fn issue(&mut self, asset: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        if self.wrappers.contains(&asset) {
            return Err(AmmError::Forbidden);
        }
        self.book_mut(asset)?.mint(to, amount)
    }

    /// Balance of `holder` in `asset`; zero for unknown assets.
    pub fn balance_of(&self, asset: &Address, holder: &Address) -> Amount {
        self.books
            .get(asset)
            .map(|book| book.balance_of(holder))
            .unwrap_or_default()
    }

    /// Total supply of `asset`; zero for unknown assets.
    pub fn total_supply(&self, asset: &Address) -> Amount {
        self.books
            .get(asset)
            .map(Book::total_supply)
            .unwrap_or_default()
    }

    /// Allowance of `spender` over `owner`'s `asset`.
    pub fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> Amount {
        self.books
            .get(asset)
            .map(|book| book.allowance(owner, spender))
            .unwrap_or_default()
    }

    /// Lets `spender` move up to `amount` of `owner`'s `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownAsset`] if `asset` is not registered.
    pub fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.book_mut(asset)?.approve(owner, spender, amount);
        Ok(())
    }

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownAsset`] if `asset` is not registered.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        trace!(%asset, %from, %to, %amount, "transfer");
        self.book_mut(asset)?.transfer(from, to, amount)
    }

    /// Moves `amount` of `asset` from `from` to `to` using `spender`'s
    /// allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownAsset`] if `asset` is not registered.
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        trace!(%asset, %spender, %from, %to, %amount, "transfer_from");
        self.book_mut(asset)?.transfer_from(spender, from, to, amount)
    }

    /// Native balance of `holder`.
    pub fn native_balance(&self, holder: &Address) -> Amount {
        self.native.get(holder).copied().unwrap_or_default()
    }

    /// Credits native balance out of thin air (genesis allocation).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance overflows.
    pub fn credit_native(&mut self, holder: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .native_balance(&holder)
            .safe_add(&amount, "native credit")?;
        self.native.insert(holder, balance);
        Ok(())
    }

    /// Moves native balance from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less.
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        trace!(%from, %to, %amount, "native transfer");
        let debited = self
            .native_balance(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.native.insert(from, debited);
        let credited = self
            .native_balance(&to)
            .safe_add(&amount, "native credit")?;
        self.native.insert(to, credited);
        Ok(())
    }

    /// Deposits `owner`'s native balance into `wrapper`, minting the same
    /// amount of the wrapped asset to `owner`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownAsset`] if `wrapper` is not a wrapped-native
    ///   adapter.
    /// - [`AmmError::InsufficientBalance`] if `owner` lacks native balance.
    pub fn wrap(
        &mut self,
        wrapper: Address,
        owner: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if !self.wrappers.contains(&wrapper) {
            return Err(AmmError::UnknownAsset);
        }
        self.transfer_native(owner, wrapper, amount)?;
        self.book_mut(wrapper)?.mint(owner, amount)
    }

    /// Burns `amount` of `owner`'s wrapped asset and releases the same
    /// native amount back to `owner`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownAsset`] if `wrapper` is not a wrapped-native
    ///   adapter.
    /// - [`AmmError::InsufficientBalance`] if `owner` holds less wrapped.
    pub fn unwrap(
        &mut self,
        wrapper: Address,
        owner: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if !self.wrappers.contains(&wrapper) {
            return Err(AmmError::UnknownAsset);
        }
        self.book_mut(wrapper)?.burn(owner, amount)?;
        self.transfer_native(wrapper, owner, amount)
    }

    pub(crate) fn register_wrapper(&mut self, wrapper: Address) -> Result<(), AmmError> {
        self.register(wrapper)?;
        self.wrappers.insert(wrapper);
        Ok(())
    }

    fn book_mut(&mut self, asset: Address) -> Result<&mut Book, AmmError> {
        self.books.get_mut(&asset).ok_or(AmmError::UnknownAsset)
    }
}

//! Pair registry and deployer.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::ExchangeConfig;
use crate::domain::{Address, Event, TokenPair};
use crate::error::AmmError;
use crate::ledger::Chain;
use crate::pair::Pair;

/// Canonical `(token_a, token_b) → pair` registry.
///
/// One factory owns one namespace of pairs: each unordered token pair maps
/// to at most one pair, at an address that is a pure function of the
/// factory address and the canonical pair.  Anyone can therefore compute a
/// pair's address offline with [`Factory::pair_address_for`].
///
/// # Governance
///
/// `fee_to` receives the protocol fee when set; only `fee_to_setter` may
/// change either field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    address: Address,
    config: ExchangeConfig,
    fee_to: Option<Address>,
    fee_to_setter: Address,
    pairs: BTreeMap<TokenPair, Address>,
    all_pairs: Vec<Address>,
}

impl Factory {
    /// The factory's own address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Parameters stamped onto every pair this factory creates.
    #[must_use]
    pub const fn config(&self) -> ExchangeConfig {
        self.config
    }

    /// Protocol fee recipient, if the protocol fee is on.
    #[must_use]
    pub const fn fee_to(&self) -> Option<Address> {
        self.fee_to
    }

    /// Account allowed to change fee settings.
    #[must_use]
    pub const fn fee_to_setter(&self) -> Address {
        self.fee_to_setter
    }

    /// Registered pair for `x`/`y` in either order.
    #[must_use]
    pub fn get_pair(&self, x: Address, y: Address) -> Option<Address> {
        let tokens = TokenPair::new(x, y).ok()?;
        self.pairs.get(&tokens).copied()
    }

    /// Every pair in creation order.
    #[must_use]
    pub fn all_pairs(&self) -> &[Address] {
        &self.all_pairs
    }

    /// Number of pairs created so far.
    #[must_use]
    pub fn all_pairs_length(&self) -> usize {
        self.all_pairs.len()
    }

    /// The `index`-th pair created.
    #[must_use]
    pub fn pair_at(&self, index: usize) -> Option<Address> {
        self.all_pairs.get(index).copied()
    }

    /// Address the `x`/`y` pair has, or will have, under this factory:
    /// `sha256(factory ‖ token_a ‖ token_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalAddresses`] if `x == y`.
    pub fn pair_address_for(&self, x: Address, y: Address) -> Result<Address, AmmError> {
        TokenPair::new(x, y).map(|tokens| self.derive_pair_address(&tokens))
    }

    fn derive_pair_address(&self, tokens: &TokenPair) -> Address {
        Address::derive(&[self.address.as_bytes(), &tokens.salt()])
    }
}

impl Chain {
    /// Deploys a factory with `fee_to_setter` as its fee administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn deploy_factory(
        &mut self,
        fee_to_setter: Address,
        config: ExchangeConfig,
    ) -> Result<Address, AmmError> {
        config.validate()?;
        let address = self.next_deployment(b"factory");
        self.factories.insert(
            address,
            Factory {
                address,
                config,
                fee_to: None,
                fee_to_setter,
                pairs: BTreeMap::new(),
                all_pairs: Vec::new(),
            },
        );
        info!(%address, fee = %config.fee(), "factory deployed");
        Ok(address)
    }

    /// Reads a deployed factory.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if nothing is deployed at
    /// `address`.
    pub fn factory(&self, address: &Address) -> Result<&Factory, AmmError> {
        self.factories.get(address).ok_or(AmmError::UnknownContract)
    }

    /// Opens a factory for state-changing calls.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownContract`] if nothing is deployed at
    /// `address`.
    pub fn factory_mut(&mut self, address: Address) -> Result<FactoryMut<'_>, AmmError> {
        if !self.factories.contains_key(&address) {
            return Err(AmmError::UnknownContract);
        }
        Ok(FactoryMut {
            chain: self,
            address,
        })
    }
}

/// Mutable handle to one factory on a [`Chain`].
#[derive(Debug)]
pub struct FactoryMut<'a> {
    chain: &'a mut Chain,
    address: Address,
}

impl FactoryMut<'_> {
    /// Deploys and registers the pair for `x`/`y`.
    ///
    /// The pair is reachable under both orderings afterwards and gets the
    /// deterministic address [`Factory::pair_address_for`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if `x == y`.
    /// - [`AmmError::InvalidConfiguration`] if either token is
    ///   [`Address::ZERO`].
    /// - [`AmmError::PairExists`] if the pair is already registered.
    pub fn create_pair(&mut self, x: Address, y: Address) -> Result<Address, AmmError> {
        let factory = self.address;
        self.chain.atomic(|chain| {
            let tokens = TokenPair::new(x, y)?;
            if tokens.token_a().is_zero() {
                return Err(AmmError::InvalidConfiguration("pair token is the zero address"));
            }
            let registry = chain.factory(&factory)?;
            if registry.pairs.contains_key(&tokens) {
                return Err(AmmError::PairExists);
            }
            let pair = registry.derive_pair_address(&tokens);
            let config = registry.config;
            if chain.pairs.contains_key(&pair) {
                return Err(AmmError::PairExists);
            }
            chain.pairs.insert(pair, Pair::new(pair, factory, tokens, config));

            let registry = state_mut(chain, factory)?;
            registry.pairs.insert(tokens, pair);
            registry.all_pairs.push(pair);
            let pair_count = registry.all_pairs.len() as u64;
            info!(
                %factory,
                %pair,
                token_a = %tokens.token_a(),
                token_b = %tokens.token_b(),
                "pair created"
            );
            chain.emit(Event::PairCreated {
                factory,
                token_a: tokens.token_a(),
                token_b: tokens.token_b(),
                pair,
                pair_count,
            });
            Ok(pair)
        })
    }

    /// Turns the protocol fee on (`Some`) or off (`None`).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee setter.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Option<Address>) -> Result<(), AmmError> {
        let registry = authorized(self.chain, self.address, caller)?;
        registry.fee_to = fee_to;
        debug!(factory = %self.address, ?fee_to, "protocol fee recipient changed");
        Ok(())
    }

    /// Hands fee administration to `setter`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee setter.
    pub fn set_fee_to_setter(&mut self, caller: Address, setter: Address) -> Result<(), AmmError> {
        let registry = authorized(self.chain, self.address, caller)?;
        registry.fee_to_setter = setter;
        debug!(factory = %self.address, %setter, "fee setter changed");
        Ok(())
    }
}

fn state_mut(chain: &mut Chain, factory: Address) -> Result<&mut Factory, AmmError> {
    chain.factories.get_mut(&factory).ok_or(AmmError::UnknownContract)
}

fn authorized(
    chain: &mut Chain,
    factory: Address,
    caller: Address,
) -> Result<&mut Factory, AmmError> {
    let registry = state_mut(chain, factory)?;
    if registry.fee_to_setter != caller {
        return Err(AmmError::Forbidden);
    }
    Ok(registry)
}

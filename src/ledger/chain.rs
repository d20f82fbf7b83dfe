//! The shared, transaction-serialized ledger every contract runs on.

use std::collections::BTreeMap;

use tracing::{debug, info, trace, warn};

use super::AssetLedger;
use crate::domain::{Address, Event, Timestamp};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::migrator::LegacyExchange;
use crate::pair::Pair;

/// Global ledger state: assets, deployed contracts, clock and event log.
///
/// Contracts never hold references to each other; they hold [`Address`]
/// handles and resolve them through the chain on every call.  That keeps
/// the borrow graph a tree and lets a flash-swap callback receive
/// `&mut Chain` and observe (and be refused by) a locked pair.
///
/// # Atomicity
///
/// [`Chain::atomic`] is the transaction boundary.  Every public
/// state-changing entry point of pairs, factories, the router, the
/// migrator and legacy exchanges runs inside it, so a failure anywhere in
/// a call chain restores balances, pair state, locks and the event log to
/// what they were before the outermost failing call.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, Amount};
/// use pairswap::error::AmmError;
/// use pairswap::ledger::Chain;
///
/// let mut chain = Chain::new();
/// let token = chain.deploy_asset("token").expect("fresh asset");
/// let alice = Address::from_label("alice");
/// chain.assets_mut().issue(token, alice, Amount::new(10)).expect("issued");
///
/// let failed = chain.atomic(|chain| -> Result<(), AmmError> {
///     chain.assets_mut().transfer(token, alice, Address::ZERO, Amount::new(10))?;
///     Err(AmmError::Expired)
/// });
/// assert_eq!(failed, Err(AmmError::Expired));
/// assert_eq!(chain.assets().balance_of(&token, &alice), Amount::new(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chain {
    assets: AssetLedger,
    pub(crate) factories: BTreeMap<Address, Factory>,
    pub(crate) pairs: BTreeMap<Address, Pair>,
    pub(crate) legacy_exchanges: BTreeMap<Address, LegacyExchange>,
    pub(crate) legacy_registry: BTreeMap<Address, Address>,
    now: Timestamp,
    events: Vec<Event>,
    deployments: u64,
    depth: u32,
}

impl Chain {
    /// An empty ledger at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current block time.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// Sets the block time.  Time never moves backwards.
    pub fn set_time(&mut self, at: Timestamp) {
        if at > self.now {
            self.now = at;
        }
    }

    /// Advances the block time by `secs`.
    pub fn advance(&mut self, secs: u64) {
        self.now = self.now.plus(secs);
    }

    /// Rejects the call if `deadline` has passed.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Expired`] if `now > deadline`.
    pub fn ensure_deadline(&self, deadline: Timestamp) -> Result<(), AmmError> {
        if self.now > deadline {
            return Err(AmmError::Expired);
        }
        Ok(())
    }

    /// Asset balances, read-only.
    #[must_use]
    pub const fn assets(&self) -> &AssetLedger {
        &self.assets
    }

    /// Asset balances, for direct transfers by external accounts.
    pub fn assets_mut(&mut self) -> &mut AssetLedger {
        &mut self.assets
    }

    /// Registers a fresh fungible asset at an address derived from `label`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the label was used.
    pub fn deploy_asset(&mut self, label: &str) -> Result<Address, AmmError> {
        let asset = Address::derive(&[b"asset", label.as_bytes()]);
        self.assets.register(asset)?;
        info!(%asset, label, "asset deployed");
        Ok(asset)
    }

    /// Deploys a wrapped-native adapter and returns its asset address.
    ///
    /// # Errors
    ///
    /// Propagates registration failures.
    pub fn deploy_wrapped_native(&mut self) -> Result<Address, AmmError> {
        let wrapper = self.next_deployment(b"wrapped-native");
        self.assets.register_wrapper(wrapper)?;
        info!(%wrapper, "wrapped native adapter deployed");
        Ok(wrapper)
    }

    /// Events emitted by committed transactions, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drains the event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Runs `f` as one all-or-nothing transaction.
    ///
    /// On `Err`, the whole chain is restored to its state before the call.
    /// The event log is kept out of the checkpoint and cut back to its
    /// length at entry instead.
    /// Nested calls compose: an inner failure that the outer closure
    /// swallows only undoes the inner effects.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn atomic<T, F>(&mut self, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Self) -> Result<T, AmmError>,
    {
        let log = std::mem::take(&mut self.events);
        let mark = log.len();
        let checkpoint = self.clone();
        self.events = log;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        if let Err(error) = &result {
            let mut log = std::mem::take(&mut self.events);
            log.truncate(mark);
            *self = checkpoint;
            self.events = log;
            if self.depth == 0 {
                warn!(%error, "transaction reverted");
            } else {
                debug!(%error, depth = self.depth, "nested call reverted");
            }
        }
        result
    }

    pub(crate) fn emit(&mut self, event: Event) {
        trace!(?event, "event");
        self.events.push(event);
    }

    pub(crate) fn next_deployment(&mut self, kind: &[u8]) -> Address {
        self.deployments += 1;
        Address::derive(&[b"deploy", kind, &self.deployments.to_be_bytes()])
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Amount;

    fn funded() -> (Chain, Address, Address) {
        let mut chain = Chain::new();
        let Ok(token) = chain.deploy_asset("t") else {
            panic!("deploy");
        };
        let alice = Address::from_label("alice");
        let Ok(()) = chain.assets_mut().issue(token, alice, Amount::new(100)) else {
            panic!("issue");
        };
        (chain, token, alice)
    }

    #[test]
    fn atomic_commits_on_ok() {
        let (mut chain, token, alice) = funded();
        let bob = Address::from_label("bob");
        let Ok(()) = chain.atomic(|c| c.assets_mut().transfer(token, alice, bob, Amount::new(5)))
        else {
            panic!("transfer");
        };
        assert_eq!(chain.assets().balance_of(&token, &bob), Amount::new(5));
    }

    #[test]
    fn atomic_rolls_back_events_and_balances() {
        let (mut chain, token, alice) = funded();
        let bob = Address::from_label("bob");
        let result: Result<(), AmmError> = chain.atomic(|c| {
            c.assets_mut().transfer(token, alice, bob, Amount::new(5))?;
            c.emit(Event::Sync {
                pair: bob,
                reserve_a: Amount::ZERO,
                reserve_b: Amount::ZERO,
                at: Timestamp::ZERO,
            });
            Err(AmmError::InvariantViolation)
        });
        assert_eq!(result, Err(AmmError::InvariantViolation));
        assert_eq!(chain.assets().balance_of(&token, &bob), Amount::ZERO);
        assert!(chain.events().is_empty());
    }

    #[test]
    fn swallowed_inner_failure_keeps_outer_effects() {
        let (mut chain, token, alice) = funded();
        let bob = Address::from_label("bob");
        let Ok(()) = chain.atomic(|c| {
            c.assets_mut().transfer(token, alice, bob, Amount::new(1))?;
            let inner: Result<(), AmmError> = c.atomic(|c| {
                c.assets_mut().transfer(token, alice, bob, Amount::new(2))?;
                Err(AmmError::Expired)
            });
            assert!(inner.is_err());
            Ok(())
        }) else {
            panic!("outer");
        };
        assert_eq!(chain.assets().balance_of(&token, &bob), Amount::new(1));
    }

    fn sync_event(pair: Address, reserve: u128) -> Event {
        Event::Sync {
            pair,
            reserve_a: Amount::new(reserve),
            reserve_b: Amount::new(reserve),
            at: Timestamp::ZERO,
        }
    }

    #[test]
    fn revert_truncates_only_its_own_events() {
        let (mut chain, _, alice) = funded();
        chain.emit(sync_event(alice, 1));
        let Ok(()) = chain.atomic(|c| {
            c.emit(sync_event(alice, 2));
            let inner: Result<(), AmmError> = c.atomic(|c| {
                c.emit(sync_event(alice, 3));
                Err(AmmError::Expired)
            });
            assert!(inner.is_err());
            c.emit(sync_event(alice, 4));
            Ok(())
        }) else {
            panic!("outer");
        };
        let expected: Vec<Event> = [1, 2, 4].into_iter().map(|r| sync_event(alice, r)).collect();
        assert_eq!(chain.events(), expected.as_slice());
    }

    #[test]
    fn deadline_checks() {
        let mut chain = Chain::new();
        chain.set_time(Timestamp::from_secs(100));
        assert!(chain.ensure_deadline(Timestamp::from_secs(100)).is_ok());
        assert_eq!(
            chain.ensure_deadline(Timestamp::from_secs(99)),
            Err(AmmError::Expired)
        );
    }

    #[test]
    fn clock_is_monotonic() {
        let mut chain = Chain::new();
        chain.advance(50);
        chain.set_time(Timestamp::from_secs(10));
        assert_eq!(chain.now(), Timestamp::from_secs(50));
    }

    #[test]
    fn deployments_get_distinct_addresses() {
        let mut chain = Chain::new();
        let (Ok(w1), Ok(w2)) = (chain.deploy_wrapped_native(), chain.deploy_wrapped_native()) else {
            panic!("deploy");
        };
        assert_ne!(w1, w2);
        assert!(chain.assets().is_wrapped_native(&w1));
    }
}

//! Observable events for indexers and tests.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Timestamp};

/// Events recorded on the ledger's log.
///
/// Every variant names the contract that emitted it so a single log can
/// be filtered per pair or per factory.  Events emitted inside a reverted
/// transaction are discarded together with its other effects.
///
/// Serialized with the variant name as the outer key, e.g.
/// `{"Sync":{"pair":..,"reserve_a":1000,..}}`, which keeps `u128` amounts
/// readable back from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A factory registered a new pair.
    PairCreated {
        factory: Address,
        token_a: Address,
        token_b: Address,
        pair: Address,
        pair_count: u64,
    },
    /// Shares were minted against newly deposited assets.
    Mint {
        pair: Address,
        sender: Address,
        amount_a: Amount,
        amount_b: Amount,
    },
    /// Shares were burned and assets paid out.
    Burn {
        pair: Address,
        sender: Address,
        amount_a: Amount,
        amount_b: Amount,
        recipient: Address,
    },
    /// A swap settled.
    Swap {
        pair: Address,
        sender: Address,
        amount_a_in: Amount,
        amount_b_in: Amount,
        amount_a_out: Amount,
        amount_b_out: Amount,
        recipient: Address,
    },
    /// Reserves were reconciled with held balances.
    Sync {
        pair: Address,
        reserve_a: Amount,
        reserve_b: Amount,
        at: Timestamp,
    },
    /// A legacy exchange took a deposit.
    LegacyDeposit {
        exchange: Address,
        provider: Address,
        amount_token: Amount,
        amount_native: Amount,
    },
    /// A legacy exchange paid out a withdrawal.
    LegacyWithdrawal {
        exchange: Address,
        owner: Address,
        amount_token: Amount,
        amount_native: Amount,
    },
    /// A legacy position was moved into a pair.
    Migrated {
        migrator: Address,
        owner: Address,
        token: Address,
        amount_token: Amount,
        amount_native: Amount,
        recipient: Address,
    },
}

impl Event {
    /// The contract that emitted the event.
    #[must_use]
    pub const fn emitter(&self) -> Address {
        match self {
            Self::PairCreated { factory, .. } => *factory,
            Self::Mint { pair, .. }
            | Self::Burn { pair, .. }
            | Self::Swap { pair, .. }
            | Self::Sync { pair, .. } => *pair,
            Self::LegacyDeposit { exchange, .. } | Self::LegacyWithdrawal { exchange, .. } => {
                *exchange
            }
            Self::Migrated { migrator, .. } => *migrator,
        }
    }
}

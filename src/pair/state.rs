//! Stored state of a trading pair.

use super::oracle::PriceAccumulator;
use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, FeeRatio, Shares, Timestamp, TokenPair};
use crate::error::AmmError;
use crate::ledger::ShareLedger;
use crate::math::U256;

/// Largest reserve a pair may hold: `2^112 − 1`.
///
/// Keeps `reserve × reserve × denominator²` comfortably inside 256 bits
/// and Q112.112 prices inside the accumulator width.
pub const MAX_RESERVE: Amount = Amount::new((1u128 << 112) - 1);

/// A two-asset constant-product pool.
///
/// Read through [`Chain::pair`](crate::ledger::Chain::pair); mutate only
/// through [`PairMut`](super::PairMut), whose entry points take the
/// reentrancy lock and run atomically.
///
/// # State
///
/// - `reserve_a` / `reserve_b`: last synced balances, never above
///   [`MAX_RESERVE`]
/// - `shares`: liquidity share ledger; the minimum lock sits at
///   [`Address::ZERO`]
/// - `k_last`: `reserve_a × reserve_b` after the last liquidity event,
///   only tracked while a protocol fee recipient is set
/// - `oracle`: TWAP accumulators
/// - `locked`: reentrancy flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub(super) address: Address,
    pub(super) factory: Address,
    pub(super) tokens: TokenPair,
    pub(super) config: ExchangeConfig,
    pub(super) reserve_a: Amount,
    pub(super) reserve_b: Amount,
    pub(super) shares: ShareLedger,
    pub(super) oracle: PriceAccumulator,
    pub(super) k_last: U256,
    pub(super) locked: bool,
}

impl Pair {
    pub(crate) fn new(
        address: Address,
        factory: Address,
        tokens: TokenPair,
        config: ExchangeConfig,
    ) -> Self {
        Self {
            address,
            factory,
            tokens,
            config,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            shares: ShareLedger::default(),
            oracle: PriceAccumulator::default(),
            k_last: U256::zero(),
            locked: false,
        }
    }

    /// The pair's own address; it holds the reserves and custody shares.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Factory that created the pair.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// The two assets, canonically ordered.
    #[must_use]
    pub const fn tokens(&self) -> TokenPair {
        self.tokens
    }

    /// Swap fee charged on inputs.
    #[must_use]
    pub const fn fee(&self) -> FeeRatio {
        self.config.fee()
    }

    /// Parameters inherited from the factory.
    #[must_use]
    pub const fn config(&self) -> ExchangeConfig {
        self.config
    }

    /// `(reserve_a, reserve_b, last_update)`.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount, Timestamp) {
        (self.reserve_a, self.reserve_b, self.oracle.last_update())
    }

    /// Reserves ordered so the first belongs to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `token` is not in the pair.
    pub fn reserves_for(&self, token: &Address) -> Result<(Amount, Amount), AmmError> {
        self.tokens.orient(token, (self.reserve_a, self.reserve_b))
    }

    /// Outstanding shares, locked ones included.
    #[must_use]
    pub fn total_shares(&self) -> Shares {
        self.shares.total()
    }

    /// Shares held by `holder`.
    #[must_use]
    pub fn share_balance_of(&self, holder: &Address) -> Shares {
        self.shares.balance_of(holder)
    }

    /// Shares `spender` may move on behalf of `owner`.
    #[must_use]
    pub fn share_allowance(&self, owner: &Address, spender: &Address) -> Shares {
        self.shares.allowance(owner, spender)
    }

    /// TWAP accumulators.
    #[must_use]
    pub const fn oracle(&self) -> &PriceAccumulator {
        &self.oracle
    }

    /// Reserve product recorded at the last liquidity event; zero while
    /// the protocol fee is off.
    #[must_use]
    pub const fn k_last(&self) -> U256 {
        self.k_last
    }

    /// `true` while one of the pair's entry points is executing.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }
}

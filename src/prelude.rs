//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use pairswap::prelude::*;
//! ```

pub use crate::config::ExchangeConfig;
pub use crate::domain::{
    Address, Amount, Deposit, Event, FeeRatio, Rounding, Shares, SwapPath, Timestamp, TokenPair,
    Withdrawal,
};
pub use crate::error::{AmmError, Result};
pub use crate::factory::{Factory, FactoryMut};
pub use crate::ledger::Chain;
pub use crate::migrator::{MigrationReceipt, MigrationRequest, Migrator};
pub use crate::pair::{Pair, PairMut};
pub use crate::router::{
    AddLiquidity, AddLiquidityNative, RemoveLiquidity, RemoveLiquidityNative, Router, SwapExactIn,
    SwapExactOut,
};
pub use crate::traits::{FlashLoan, FlashSwap, FlashSwapCallee, LiquiditySource};

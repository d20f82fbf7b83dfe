//! Unified error types for the exchange engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every error is transaction-fatal: the enclosing
//! [`Chain::atomic`](crate::ledger::Chain::atomic) call rolls back all of
//! its effects before the error reaches the caller, and nothing is retried.

use thiserror::Error;

/// Errors produced by pairs, factories, the router, the migrator and the
/// ledger they run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AmmError {
    /// Both tokens of a pair are the same asset.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// A pair for the token pair is already registered.
    #[error("pair already exists")]
    PairExists,

    /// No pair is registered for a hop of the requested path.
    #[error("pair not found")]
    PairNotFound,

    /// A deposit would mint zero liquidity shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would return zero of either asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Requested or produced output is zero, above reserves, or below the
    /// caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// Required input exceeds the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// A ratio-matched deposit or a withdrawal fell below its minimum.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// Post-swap balances fail the fee-adjusted constant-product check.
    #[error("constant-product invariant violated")]
    InvariantViolation,

    /// The operation's deadline has passed.
    #[error("transaction expired")]
    Expired,

    /// A pair entry point was called while the pair was already locked.
    #[error("reentrant call")]
    Reentrancy,

    /// The migrated token amount is below the caller's minimum.
    #[error("insufficient token amount for migration")]
    InsufficientXAmount,

    /// The migrated native amount is below the caller's minimum.
    #[error("insufficient native amount for migration")]
    InsufficientNativeAmount,

    /// A swap received no input.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Reserves are empty or cannot cover the requested output.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A swap path is malformed.
    #[error("invalid path: {0}")]
    InvalidPath(&'static str),

    /// Swap output was directed at one of the pair's own tokens.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// Caller is not allowed to perform an administrative action.
    #[error("forbidden")]
    Forbidden,

    /// Holder balance cannot cover a transfer.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Spender allowance cannot cover a delegated transfer.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// The asset is not registered on the ledger.
    #[error("unknown asset")]
    UnknownAsset,

    /// No contract (factory, pair, exchange) is deployed at the address.
    #[error("unknown contract")]
    UnknownContract,

    /// A legacy exchange already exists for the token.
    #[error("exchange already exists")]
    ExchangeExists,

    /// The legacy position to withdraw or migrate is empty.
    #[error("empty position")]
    EmptyPosition,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Arithmetic overflow.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

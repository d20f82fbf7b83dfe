//! Extension points that outside code implements.
//!
//! - [`FlashSwapCallee`]: receives control in the middle of a flash swap.
//! - [`LiquiditySource`]: a pool whose positions can be withdrawn by the
//!   migrator.

mod flash_swap;
mod liquidity_source;

pub use flash_swap::{FlashLoan, FlashSwap, FlashSwapCallee};
pub use liquidity_source::LiquiditySource;

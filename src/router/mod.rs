//! Multi-hop routing and liquidity management.
//!
//! The [`Router`] is stateless: it resolves pairs through one factory,
//! checks deadlines and slippage bounds, and moves assets straight from
//! the caller into pairs.  Pricing lives in free functions so off-chain
//! callers can quote without a router.
//!
//! | Call                          | Bound checked                  | Error on violation          |
//! |-------------------------------|--------------------------------|-----------------------------|
//! | [`Router::swap_exact_in`]     | last amount ≥ `amount_out_min` | `InsufficientOutputAmount`  |
//! | [`Router::swap_exact_out`]    | first amount ≤ `amount_in_max` | `ExcessiveInputAmount`      |
//! | [`Router::add_liquidity`]     | both matched amounts ≥ minimum | `InsufficientAmount`        |
//! | [`Router::remove_liquidity`]  | both payouts ≥ minimum         | `InsufficientAmount`        |
//! | every call                    | `now ≤ deadline`               | `Expired`                   |
//!
//! The `*_native` variants bridge native value through the wrapped-native
//! adapter at the start or end of a path.

mod exchange_router;
mod library;
mod quote;
mod request;

#[cfg(test)]
mod proptest_properties;

pub use exchange_router::Router;
pub use library::{amounts_in, amounts_out, pair_for, reserves_for, sort_tokens};
pub use quote::{quote, quote_amount_in, quote_amount_out};
pub use request::{
    AddLiquidity, AddLiquidityNative, RemoveLiquidity, RemoveLiquidityNative, SwapExactIn,
    SwapExactOut,
};

//! Constant-product trading pairs.
//!
//! A [`Pair`] holds two reserves and issues fungible shares against them.
//! Deposits are detected by balance diffing: assets are transferred to the
//! pair's address first, then [`PairMut::mint`] or [`PairMut::swap`] is
//! called to account for them.
//!
//! # Invariants
//!
//! | Operation | Guarantee                                                    |
//! |-----------|--------------------------------------------------------------|
//! | `mint`    | shares ∝ deposit; first deposit locks `MIN` shares forever   |
//! | `burn`    | payout = `shares / total × reserve` on each side             |
//! | `swap`    | `(bₐ·D − inₐ·f)(b_b·D − in_b·f) ≥ rₐ·r_b·D²`                 |
//! | `sync`    | reserves := balances                                         |
//! | any       | reserves ≤ 2^112 − 1; lock held for the whole call            |
//!
//! All state changes go through [`PairMut`]; each of its entry points is
//! atomic and guarded by the pair's reentrancy lock.

mod guard;
mod ops;
mod oracle;
mod state;

#[cfg(test)]
mod proptest_properties;
#[cfg(test)]
pub(crate) mod testkit;

pub use ops::PairMut;
pub use oracle::{PriceAccumulator, PriceObservation, PRICE_RESOLUTION};
pub use state::{Pair, MAX_RESERVE};

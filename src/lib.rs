//! # pairswap
//!
//! A constant-product exchange engine running on an in-memory,
//! transaction-serialized ledger.
//!
//! The crate models four contracts and the environment they share:
//!
//! - **Pair**: two reserves, fungible liquidity shares, flash swaps,
//!   a reentrancy lock and cumulative-price accumulators.
//! - **Factory**: one pair per unordered token pair, at an address derived
//!   deterministically from the factory and the two tokens.
//! - **Router**: quotes, multi-hop swaps and liquidity management with
//!   deadlines and slippage bounds, including native-asset variants.
//! - **Migrator**: moves a position out of the legacy single-token/native
//!   exchange into the matching pair, refunding what does not match.
//!
//! Every state-changing call runs inside [`Chain::atomic`](ledger::Chain::atomic):
//! it either commits in full or leaves no trace.
//!
//! ## Swap through the router
//!
//! ```rust
//! use pairswap::config::ExchangeConfig;
//! use pairswap::domain::{Address, Amount, SwapPath, Timestamp};
//! use pairswap::ledger::Chain;
//! use pairswap::router::{AddLiquidity, Router, SwapExactIn};
//!
//! let mut chain = Chain::new();
//! let x = chain.deploy_asset("x").expect("asset");
//! let y = chain.deploy_asset("y").expect("asset");
//! let native = chain.deploy_wrapped_native().expect("wrapper");
//! let alice = Address::from_label("alice");
//! let factory = chain.deploy_factory(alice, ExchangeConfig::default()).expect("factory");
//! let router = Router::new(Address::from_label("router"), factory, native);
//!
//! for token in [x, y] {
//!     chain.assets_mut().issue(token, alice, Amount::new(1_000_000)).expect("issued");
//!     chain.assets_mut().approve(token, alice, router.address(), Amount::MAX).expect("approved");
//! }
//!
//! let deposit = AddLiquidity {
//!     token_x: x,
//!     token_y: y,
//!     desired_x: Amount::new(100_000),
//!     desired_y: Amount::new(100_000),
//!     min_x: Amount::ZERO,
//!     min_y: Amount::ZERO,
//!     recipient: alice,
//!     deadline: Timestamp::NEVER,
//! };
//! router.add_liquidity(&mut chain, alice, &deposit).expect("pair created and funded");
//!
//! let swap = SwapExactIn {
//!     amount_in: Amount::new(10_000),
//!     amount_out_min: Amount::new(9_000),
//!     path: SwapPath::new(vec![x, y]).expect("two hops"),
//!     recipient: alice,
//!     deadline: Timestamp::NEVER,
//! };
//! let amounts = router.swap_exact_in(&mut chain, alice, &swap).expect("swapped");
//! assert_eq!(amounts, vec![Amount::new(10_000), Amount::new(9_066)]);
//! ```
//!
//! # Module Guide
//!
//! | Module       | Purpose                                                         |
//! |--------------|-----------------------------------------------------------------|
//! | [`domain`]   | [`Address`](domain::Address), [`Amount`](domain::Amount), events  |
//! | [`math`]     | Checked and 256-bit arithmetic, integer square root             |
//! | [`config`]   | [`ExchangeConfig`](config::ExchangeConfig): fee, lock, protocol fee |
//! | [`ledger`]   | [`Chain`](ledger::Chain), asset and share books                 |
//! | [`pair`]     | [`Pair`](pair::Pair) state and [`PairMut`](pair::PairMut) calls |
//! | [`factory`]  | [`Factory`](factory::Factory) registry                          |
//! | [`router`]   | [`Router`](router::Router) and pricing functions                |
//! | [`migrator`] | Legacy exchange and [`Migrator`](migrator::Migrator)            |
//! | [`traits`]   | Flash-swap callee and liquidity-source capabilities             |
//! | [`error`]    | [`AmmError`](error::AmmError)                                   |
//! | [`prelude`]  | Common re-exports                                               |

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod migrator;
pub mod pair;
pub mod prelude;
pub mod router;
pub mod traits;

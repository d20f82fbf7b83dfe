//! Migration from the legacy exchange generation.
//!
//! The legacy design runs one [`LegacyExchange`] per token, each pooling
//! that token against the native asset.  The [`Migrator`] redeems a
//! position through the [`LiquiditySource`](crate::traits::LiquiditySource)
//! capability and re-deposits it into the matching current pair via the
//! router:
//!
//! | Source          | Adapter          | Redeems through                       |
//! |-----------------|------------------|---------------------------------------|
//! | legacy exchange | [`LegacySource`] | `LegacyExchangeMut::withdraw`         |
//! | current pair    | [`PairSource`]   | `PairMut::burn`, then native unwrap   |

mod legacy_exchange;
mod position_migrator;
mod sources;

pub use legacy_exchange::{LegacyExchange, LegacyExchangeMut};
pub use position_migrator::{MigrationReceipt, MigrationRequest, Migrator};
pub use sources::{LegacySource, PairSource};

//! The execution environment: a serialized ledger of assets and contracts.
//!
//! [`Chain`] owns all state and provides the transaction boundary;
//! [`AssetLedger`] implements the fungible-asset, native-asset and
//! wrapped-native interfaces the exchange consumes; [`ShareLedger`] is the
//! share book pools keep for their liquidity providers.

mod assets;
mod book;
mod chain;
mod shares;

pub use assets::AssetLedger;
pub use book::Book;
pub use chain::Chain;
pub use shares::ShareLedger;

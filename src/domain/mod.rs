//! Value types of the exchange domain.
//!
//! Newtypes with validated constructors for identities, amounts, shares,
//! fees, time and routes, plus the event and receipt records the engine
//! produces.

mod address;
mod amount;
mod event;
mod fee_ratio;
mod receipt;
mod rounding;
mod shares;
mod swap_path;
mod timestamp;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub use event::Event;
pub use fee_ratio::FeeRatio;
pub use receipt::{Deposit, Withdrawal};
pub use rounding::Rounding;
pub use shares::Shares;
pub use swap_path::SwapPath;
pub use timestamp::Timestamp;
pub use token_pair::TokenPair;

//! Outcomes of liquidity operations.

use serde::{Deserialize, Serialize};

use super::{Amount, Shares};

/// Amounts actually deposited and the shares minted for them.
///
/// `amount_x`/`amount_y` follow the caller's token order, not the pair's
/// canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deposit {
    /// Deposited amount of the caller's first token.
    pub amount_x: Amount,
    /// Deposited amount of the caller's second token.
    pub amount_y: Amount,
    /// Shares credited to the recipient.
    pub shares: Shares,
}

/// Amounts paid out for burned shares, in the caller's token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Amount of the caller's first token returned.
    pub amount_x: Amount,
    /// Amount of the caller's second token returned.
    pub amount_y: Amount,
}

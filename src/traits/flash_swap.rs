//! Callback interface for flash swaps.
//!
//! A flash swap hands the requested outputs to the recipient *before*
//! payment is checked, then calls back into the recipient.  The callee may
//! do anything with `&mut Chain` (trade elsewhere, repay, even try to call
//! the same pair again) as long as, when it returns, the pair's balances
//! satisfy the fee-adjusted product check.
//!
//! # Sequence
//!
//! 1. Pair transfers `amount_a_out` / `amount_b_out` to the recipient.
//! 2. Pair calls [`FlashSwapCallee::on_flash_swap`] with a [`FlashLoan`].
//! 3. Pair measures inputs from its balances and enforces the invariant.
//!
//! Re-entering the pair during step 2 fails with
//! [`AmmError::Reentrancy`](crate::error::AmmError::Reentrancy); an error
//! returned from the callback reverts the whole swap.

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::ledger::Chain;

/// What the pair lent out, passed to the callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashLoan<'d> {
    /// The pair that is being swapped against.
    pub pair: Address,
    /// Caller of the swap.
    pub sender: Address,
    /// Token A already sent to the recipient.
    pub amount_a_out: Amount,
    /// Token B already sent to the recipient.
    pub amount_b_out: Amount,
    /// Opaque bytes forwarded from the swap call.
    pub data: &'d [u8],
}

/// Receiver of flash-swap callbacks.
///
/// # Errors
///
/// Any error returned aborts the swap and rolls back the transfers made
/// in step 1.
pub trait FlashSwapCallee {
    /// Called once, after outputs are transferred and before the invariant
    /// check.
    ///
    /// # Errors
    ///
    /// Implementation-defined; propagated unchanged to the swap caller.
    fn on_flash_swap(&mut self, chain: &mut Chain, loan: &FlashLoan<'_>) -> Result<(), AmmError>;
}

/// A callee plus the data to forward; passing one to a swap turns it into
/// a flash swap.
pub struct FlashSwap<'a> {
    pub(crate) callee: &'a mut dyn FlashSwapCallee,
    pub(crate) data: &'a [u8],
}

impl<'a> FlashSwap<'a> {
    /// Bundles `callee` with `data`.
    pub fn new(callee: &'a mut dyn FlashSwapCallee, data: &'a [u8]) -> Self {
        Self { callee, data }
    }
}

impl core::fmt::Debug for FlashSwap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlashSwap")
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

//! Per-pair reentrancy lock.
//!
//! The lock lives in the pair's stored state, so a callback that receives
//! `&mut Chain` mid-swap sees it set and is refused on re-entry.  Because
//! the flag is ledger state, a reverted transaction also restores it.

use tracing::warn;

use crate::domain::Address;
use crate::error::AmmError;
use crate::ledger::Chain;

/// Runs `f` with `pair` locked.
///
/// The lock is released whether `f` succeeds or fails, so an error
/// swallowed by an outer caller cannot leave the pair stuck.
///
/// # Errors
///
/// - [`AmmError::UnknownContract`] if `pair` is not deployed.
/// - [`AmmError::Reentrancy`] if the pair is already locked.
/// - Whatever `f` returns.
pub(crate) fn locked<T, F>(chain: &mut Chain, pair: Address, f: F) -> Result<T, AmmError>
where
    F: FnOnce(&mut Chain) -> Result<T, AmmError>,
{
    set_lock(chain, pair, true)?;
    let result = f(chain);
    set_lock(chain, pair, false)?;
    result
}

fn set_lock(chain: &mut Chain, pair: Address, on: bool) -> Result<(), AmmError> {
    let state = chain.pairs.get_mut(&pair).ok_or(AmmError::UnknownContract)?;
    if on && state.locked {
        warn!(%pair, "re-entrant call refused");
        return Err(AmmError::Reentrancy);
    }
    state.locked = on;
    Ok(())
}

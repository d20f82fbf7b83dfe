//! Canonically ordered pair of distinct assets.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::AmmError;

/// An unordered pair of assets stored in canonical order.
///
/// Construction sorts the two addresses so that `token_a < token_b`.
/// `(X, Y)` and `(Y, X)` therefore build equal values, which is what lets
/// the factory deduplicate pairs and derive one address per pair.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, TokenPair};
///
/// let x = Address::from_label("x");
/// let y = Address::from_label("y");
/// assert_eq!(TokenPair::new(x, y), TokenPair::new(y, x));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token_a: Address,
    token_b: Address,
}

impl TokenPair {
    /// Creates a canonically ordered pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalAddresses`] if `x == y`.
    pub fn new(x: Address, y: Address) -> Result<Self, AmmError> {
        if x == y {
            return Err(AmmError::IdenticalAddresses);
        }
        let (token_a, token_b) = if x < y { (x, y) } else { (y, x) };
        Ok(Self { token_a, token_b })
    }

    /// The lower-ordered asset.
    #[must_use]
    pub const fn token_a(&self) -> Address {
        self.token_a
    }

    /// The higher-ordered asset.
    #[must_use]
    pub const fn token_b(&self) -> Address {
        self.token_b
    }

    /// Returns `true` if `token` is one of the two assets.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// Returns `true` if `token` is the lower-ordered asset.
    #[must_use]
    pub fn is_token_a(&self, token: &Address) -> bool {
        self.token_a == *token
    }

    /// Reorders an `(a, b)` tuple so that the first element belongs to
    /// `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `token` is not in the pair.
    pub fn orient<T>(&self, token: &Address, (a, b): (T, T)) -> Result<(T, T), AmmError> {
        if *token == self.token_a {
            Ok((a, b))
        } else if *token == self.token_b {
            Ok((b, a))
        } else {
            Err(AmmError::InvalidPath("token is not part of this pair"))
        }
    }

    /// Bytes fed into pair address derivation.
    #[must_use]
    pub fn salt(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(self.token_a.as_bytes());
        out[32..].copy_from_slice(self.token_b.as_bytes());
        out
    }
}

//! Ledger identities.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte identity on the ledger.
///
/// The same type names accounts, assets, pairs, factories and legacy
/// exchanges.  Ordering is lexicographic over the bytes, which is the total
/// order pairs use to canonicalize their two tokens.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Address;
///
/// let alice = Address::from_label("alice");
/// assert_eq!(alice, Address::from_label("alice"));
/// assert_ne!(alice, Address::ZERO);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero address.  Shares credited here are unspendable.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives a stable address from a human-readable label.
    ///
    /// Handy for fixtures and deployments that want reproducible identities.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::derive(&[b"label", label.as_bytes()])
    }

    /// Derives an address as the SHA-256 digest of the concatenated parts.
    #[must_use]
    pub fn derive(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Returns `true` for [`Address::ZERO`].
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    /// Prints the first four bytes as hex, e.g. `0x1a2b3c4d…`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "…")
    }
}

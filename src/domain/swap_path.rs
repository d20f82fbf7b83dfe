//! Multi-hop swap routes.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::AmmError;

/// An ordered route of at least two assets.
///
/// Each consecutive pair of assets is one hop and must resolve to a
/// registered pair when the route is executed.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, SwapPath};
///
/// let a = Address::from_label("a");
/// let b = Address::from_label("b");
/// let c = Address::from_label("c");
/// let path = SwapPath::new(vec![a, b, c]).expect("two hops");
/// assert_eq!(path.hops().count(), 2);
/// assert!(SwapPath::new(vec![a]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Address>", into = "Vec<Address>")]
pub struct SwapPath(Vec<Address>);

impl SwapPath {
    /// Validates and wraps a route.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] for fewer than two assets.
    pub fn new(tokens: Vec<Address>) -> Result<Self, AmmError> {
        if tokens.len() < 2 {
            return Err(AmmError::InvalidPath("path needs at least two tokens"));
        }
        Ok(Self(tokens))
    }

    /// Asset sold at the start of the route.
    #[must_use]
    pub fn first(&self) -> Address {
        self.0[0]
    }

    /// Asset bought at the end of the route.
    #[must_use]
    pub fn last(&self) -> Address {
        self.0[self.0.len() - 1]
    }

    /// Number of assets in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a valid path has at least two assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(input, output)` assets per hop, in route order.
    pub fn hops(&self) -> impl DoubleEndedIterator<Item = (Address, Address)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// The route as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Address] {
        &self.0
    }
}

impl TryFrom<Vec<Address>> for SwapPath {
    type Error = AmmError;

    fn try_from(tokens: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl From<SwapPath> for Vec<Address> {
    fn from(path: SwapPath) -> Self {
        path.0
    }
}

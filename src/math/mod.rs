//! Arithmetic for reserve and share computations.
//!
//! - [`div_round`]: `u128` division with explicit [`Rounding`](crate::domain::Rounding).
//! - [`CheckedArithmetic`]: `Result`-returning add/sub for amounts and shares.
//! - [`mul_div`], [`isqrt`], [`U256`]: 256-bit intermediates for products
//!   of reserves and the first-deposit square root.

mod checked;
mod rounding;
mod wide;

pub use checked::CheckedArithmetic;
pub use rounding::div_round;
pub use wide::{isqrt, mul_div, narrow, sqrt_product, wide, U256};

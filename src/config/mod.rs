//! Declarative exchange parameters.
//!
//! An [`ExchangeConfig`] is handed to a factory at deployment; every pair
//! the factory creates inherits its fee ratio, minimum locked shares and
//! protocol fee divisor.

mod exchange_config;

pub use exchange_config::{
    ExchangeConfig, DEFAULT_MINIMUM_LOCKED_SHARES, DEFAULT_PROTOCOL_FEE_DIVISOR,
};

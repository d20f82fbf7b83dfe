//! Parameter blocks for router calls.
//!
//! Each block carries the caller's limits (slippage bounds and deadline)
//! alongside the trade itself, and can be built from JSON by a client.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, Shares, SwapPath, Timestamp};

/// Sell exactly `amount_in` along `path`, receiving at least
/// `amount_out_min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExactIn {
    pub amount_in: Amount,
    pub amount_out_min: Amount,
    pub path: SwapPath,
    pub recipient: Address,
    pub deadline: Timestamp,
}

/// Buy exactly `amount_out` along `path`, paying at most `amount_in_max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExactOut {
    pub amount_out: Amount,
    pub amount_in_max: Amount,
    pub path: SwapPath,
    pub recipient: Address,
    pub deadline: Timestamp,
}

/// Deposit into the `token_x`/`token_y` pair, creating it if needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    pub token_x: Address,
    pub token_y: Address,
    pub desired_x: Amount,
    pub desired_y: Amount,
    pub min_x: Amount,
    pub min_y: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
}

/// Deposit a token against the native asset.  The native side is the
/// value sent with the call; whatever is not matched is refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityNative {
    pub token: Address,
    pub desired_token: Amount,
    pub native_value: Amount,
    pub min_token: Amount,
    pub min_native: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
}

/// Redeem `shares` of the `token_x`/`token_y` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    pub token_x: Address,
    pub token_y: Address,
    pub shares: Shares,
    pub min_x: Amount,
    pub min_y: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
}

/// Redeem `shares` of a token/wrapped-native pair, paid out in native.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityNative {
    pub token: Address,
    pub shares: Shares,
    pub min_token: Amount,
    pub min_native: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn swap_request_from_json_validates_path() {
        let a = Address::from_label("a");
        let json = serde_json::json!({
            "amount_in": 100,
            "amount_out_min": 90,
            "path": [a],
            "recipient": a,
            "deadline": 60,
        });
        assert!(serde_json::from_value::<SwapExactIn>(json).is_err());
    }

    #[test]
    fn liquidity_request_round_trips() {
        let request = RemoveLiquidity {
            token_x: Address::from_label("x"),
            token_y: Address::from_label("y"),
            shares: Shares::new(5),
            min_x: Amount::new(1),
            min_y: Amount::new(2),
            recipient: Address::from_label("lp"),
            deadline: Timestamp::NEVER,
        };
        let Ok(json) = serde_json::to_string(&request) else {
            panic!("serialize");
        };
        let Ok(back) = serde_json::from_str::<RemoveLiquidity>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, request);
    }
}

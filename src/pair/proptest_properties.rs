//! Property-based checks of pair invariants.
//!
//! 1. **Product never falls**: `reserve_x × reserve_y` is non-decreasing
//!    across any accepted swap.
//! 2. **Fair quote is accepted, one more unit is not**.
//! 3. **No free value**: minting then burning returns at most what was
//!    deposited.
//! 4. **Reserves track balances** after every committed operation.

#![allow(clippy::panic)]

use proptest::prelude::*;

use super::testkit::Fixture;
use crate::domain::{Amount, Shares};
use crate::math::wide;

fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000_000u128
}

fn fair_out(amount_in: u128, reserve_in: u128, reserve_out: u128) -> u128 {
    let net = amount_in * 997;
    net * reserve_out / (reserve_in * 1_000 + net)
}

fn product(fx: &Fixture) -> crate::math::U256 {
    let (rx, ry) = fx.reserves_xy();
    wide(rx.get()) * wide(ry.get())
}

fn reserves_match_balances(fx: &Fixture) -> bool {
    let (rx, ry) = fx.reserves_xy();
    rx == fx.balance(fx.x, fx.pair) && ry == fx.balance(fx.y, fx.pair)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_product_non_decreasing(
        rx in reserve_strategy(),
        ry in reserve_strategy(),
        fraction in 1u128..=500u128,
    ) {
        let mut fx = Fixture::new().seeded(rx, ry);
        let before = product(&fx);
        let amount_in = (rx * fraction / 1_000).max(1);
        let out = fair_out(amount_in, rx, ry);
        prop_assume!(out > 0);
        prop_assert!(fx.swap_x_for_y(amount_in, out).is_ok());
        prop_assert!(product(&fx) >= before);
        prop_assert!(reserves_match_balances(&fx));
    }

    #[test]
    fn prop_quote_is_tight(
        rx in reserve_strategy(),
        ry in reserve_strategy(),
        amount_in in 1u128..=1_000_000u128,
    ) {
        let out = fair_out(amount_in, rx, ry);
        prop_assume!(out + 1 < ry);
        let mut fx = Fixture::new().seeded(rx, ry);
        prop_assert!(fx.swap_x_for_y(amount_in, out + 1).is_err());
        if out > 0 {
            prop_assert!(fx.swap_x_for_y(amount_in, out).is_ok());
        }
    }

    #[test]
    fn prop_mint_burn_no_free_value(
        rx in reserve_strategy(),
        ry in reserve_strategy(),
        dx in 1_000u128..=1_000_000u128,
        dy in 1_000u128..=1_000_000u128,
    ) {
        let mut fx = Fixture::new().seeded(rx, ry);
        let Ok(minted) = fx.deposit(dx, dy) else {
            return Ok(());
        };
        let (pair, lp) = (fx.pair, fx.lp);
        let Ok(mut handle) = fx.chain.pair_mut(pair) else {
            panic!("pair");
        };
        prop_assert!(handle.transfer_shares(lp, pair, minted).is_ok());
        let Ok((a, b)) = handle.burn(lp, lp) else {
            return Ok(());
        };
        let Ok((back_x, back_y)) = fx
            .chain
            .pair(&pair)
            .and_then(|p| p.tokens().orient(&fx.x, (a, b)))
        else {
            panic!("orient");
        };
        prop_assert!(back_x <= Amount::new(dx));
        prop_assert!(back_y <= Amount::new(dy));
        prop_assert!(reserves_match_balances(&fx));
    }

    #[test]
    fn prop_lock_survives_full_exit(
        rx in reserve_strategy(),
        ry in reserve_strategy(),
    ) {
        let mut fx = Fixture::new().seeded(rx, ry);
        let (pair, lp) = (fx.pair, fx.lp);
        let Ok(held) = fx.chain.pair(&pair).map(|p| p.share_balance_of(&lp)) else {
            panic!("pair");
        };
        let Ok(mut handle) = fx.chain.pair_mut(pair) else {
            panic!("pair");
        };
        prop_assert!(handle.transfer_shares(lp, pair, held).is_ok());
        prop_assert!(handle.burn(lp, lp).is_ok());
        let Ok(state) = fx.chain.pair(&pair) else {
            panic!("pair");
        };
        prop_assert_eq!(state.total_shares(), Shares::new(1_000));
        let (rx_left, ry_left) = fx.reserves_xy();
        prop_assert!(!rx_left.is_zero() && !ry_left.is_zero());
    }
}

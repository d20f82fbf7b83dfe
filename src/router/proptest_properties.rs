//! Property-based checks of the pricing functions.
//!
//! 1. **Inverse covers the target**: paying `quote_amount_in(y)` yields at
//!    least `y`.
//! 2. **Inverse is minimal**: one unit less yields less than `y`.
//! 3. **Output is bounded** by the output reserve.
//! 4. **Quote is proportional** and never exceeds the exact ratio.
//! 5. **Creation is idempotent** in either token order.

#![allow(clippy::panic)]

use proptest::prelude::*;

use super::library::pair_for;
use super::quote::{quote, quote_amount_in, quote_amount_out};
use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, FeeRatio};
use crate::error::AmmError;
use crate::ledger::Chain;

fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=1_000_000_000_000u128
}

fn out(amount_in: u128, r_in: u128, r_out: u128) -> Amount {
    let Ok(v) = quote_amount_out(
        Amount::new(amount_in),
        Amount::new(r_in),
        Amount::new(r_out),
        FeeRatio::STANDARD,
    ) else {
        panic!("quote_amount_out");
    };
    v
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_inverse_covers_target(
        r_in in reserve_strategy(),
        r_out in reserve_strategy(),
        pct in 1u128..=90u128,
    ) {
        let target = (r_out * pct / 100).max(1);
        let Ok(needed) = quote_amount_in(
            Amount::new(target),
            Amount::new(r_in),
            Amount::new(r_out),
            FeeRatio::STANDARD,
        ) else {
            panic!("quote_amount_in");
        };
        prop_assert!(out(needed.get(), r_in, r_out) >= Amount::new(target));
        if needed.get() > 1 {
            prop_assert!(out(needed.get() - 1, r_in, r_out) < Amount::new(target));
        }
    }

    #[test]
    fn prop_output_below_reserve(
        r_in in reserve_strategy(),
        r_out in reserve_strategy(),
        amount_in in 1u128..=u64::MAX as u128,
    ) {
        prop_assert!(out(amount_in, r_in, r_out) < Amount::new(r_out));
    }

    #[test]
    fn prop_quote_rounds_down(
        r_a in reserve_strategy(),
        r_b in reserve_strategy(),
        amount in 1u128..=1_000_000_000u128,
    ) {
        let Ok(q) = quote(Amount::new(amount), Amount::new(r_a), Amount::new(r_b)) else {
            panic!("quote");
        };
        // q ≤ amount·r_b/r_a < q + 1
        prop_assert!(q.get() * r_a <= amount * r_b);
        prop_assert!((q.get() + 1) * r_a > amount * r_b);
    }

    #[test]
    fn prop_creation_idempotent(label_x in "[a-z]{1,8}", label_y in "[a-z]{1,8}", flip: bool) {
        prop_assume!(label_x != label_y);
        let mut chain = Chain::new();
        let (Ok(x), Ok(y)) = (chain.deploy_asset(&label_x), chain.deploy_asset(&label_y)) else {
            panic!("assets");
        };
        let setter = Address::from_label("setter");
        let Ok(factory) = chain.deploy_factory(setter, ExchangeConfig::default()) else {
            panic!("factory");
        };
        let (first, second) = if flip { ((y, x), (x, y)) } else { ((x, y), (y, x)) };
        let Ok(pair) = chain.factory_mut(factory).and_then(|mut f| f.create_pair(first.0, first.1))
        else {
            panic!("create");
        };
        let again = chain.factory_mut(factory).and_then(|mut f| f.create_pair(second.0, second.1));
        prop_assert_eq!(again, Err(AmmError::PairExists));
        prop_assert_eq!(pair_for(&chain, &factory, x, y), Ok(pair));
        prop_assert_eq!(pair_for(&chain, &factory, y, x), Ok(pair));
    }
}

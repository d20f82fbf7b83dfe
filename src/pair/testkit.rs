//! Shared setup for pair, router and migrator unit tests.

#![allow(clippy::panic)]

use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, FeeRatio, Shares};
use crate::error::AmmError;
use crate::ledger::Chain;

/// Funds handed to every test account.
pub(crate) const FUNDING: u128 = 1_000_000_000_000_000_000;

/// A chain with one factory, two funded assets and their pair.
pub(crate) struct Fixture {
    pub chain: Chain,
    pub factory: Address,
    pub pair: Address,
    pub x: Address,
    pub y: Address,
    pub lp: Address,
    pub admin: Address,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(ExchangeConfig::default())
    }

    /// Lock of a single share, so tiny textbook reserves like 1000/1000
    /// can be seeded.
    pub fn small_lock() -> Self {
        let Ok(config) = ExchangeConfig::new(FeeRatio::STANDARD, Shares::new(1), 6) else {
            panic!("valid config");
        };
        Self::with_config(config)
    }

    pub fn with_config(config: ExchangeConfig) -> Self {
        let mut chain = Chain::new();
        let (Ok(x), Ok(y)) = (chain.deploy_asset("x"), chain.deploy_asset("y")) else {
            panic!("assets");
        };
        let lp = Address::from_label("lp");
        let admin = Address::from_label("admin");
        for token in [x, y] {
            let Ok(()) = chain.assets_mut().issue(token, lp, Amount::new(FUNDING)) else {
                panic!("issue");
            };
        }
        let Ok(factory) = chain.deploy_factory(admin, config) else {
            panic!("factory");
        };
        let Ok(pair) = chain.factory_mut(factory).and_then(|mut f| f.create_pair(x, y)) else {
            panic!("pair");
        };
        Self {
            chain,
            factory,
            pair,
            x,
            y,
            lp,
            admin,
        }
    }

    /// Gives `who` some of both assets.
    pub fn fund(&mut self, who: Address, amount: u128) {
        for token in [self.x, self.y] {
            let Ok(()) = self.chain.assets_mut().issue(token, who, Amount::new(amount)) else {
                panic!("issue");
            };
        }
    }

    /// Pushes `x`/`y` from the provider and mints, all-or-nothing.
    pub fn deposit(&mut self, amount_x: u128, amount_y: u128) -> Result<Shares, AmmError> {
        let (pair, x, y, lp) = (self.pair, self.x, self.y, self.lp);
        self.chain.atomic(|chain| {
            chain.assets_mut().transfer(x, lp, pair, Amount::new(amount_x))?;
            chain.assets_mut().transfer(y, lp, pair, Amount::new(amount_y))?;
            chain.pair_mut(pair)?.mint(lp, lp)
        })
    }

    /// Seeds the pair and panics on failure.
    pub fn seeded(mut self, amount_x: u128, amount_y: u128) -> Self {
        let Ok(_) = self.deposit(amount_x, amount_y) else {
            panic!("seed deposit");
        };
        self
    }

    /// Reserves as `(x, y)`.
    pub fn reserves_xy(&self) -> (Amount, Amount) {
        let Ok(pair) = self.chain.pair(&self.pair) else {
            panic!("pair");
        };
        let Ok(reserves) = pair.reserves_for(&self.x) else {
            panic!("x is in the pair");
        };
        reserves
    }

    /// Maps `(x-side, y-side)` to the pair's canonical `(a, b)` order.
    pub fn canonical(&self, x_side: u128, y_side: u128) -> (Amount, Amount) {
        let Ok(pair) = self.chain.pair(&self.pair) else {
            panic!("pair");
        };
        let sides = (Amount::new(x_side), Amount::new(y_side));
        let Ok(ordered) = pair.tokens().orient(&self.x, sides) else {
            panic!("x is in the pair");
        };
        ordered
    }

    /// Pays `amount_x_in` of x from the provider and takes `amount_y_out`
    /// of y, all-or-nothing.
    pub fn swap_x_for_y(&mut self, amount_x_in: u128, amount_y_out: u128) -> Result<(), AmmError> {
        let (pair, x, lp) = (self.pair, self.x, self.lp);
        let (out_a, out_b) = self.canonical(0, amount_y_out);
        self.chain.atomic(|chain| {
            chain.assets_mut().transfer(x, lp, pair, Amount::new(amount_x_in))?;
            chain.pair_mut(pair)?.swap(lp, out_a, out_b, lp, None)
        })
    }

    pub fn balance(&self, token: Address, holder: Address) -> Amount {
        self.chain.assets().balance_of(&token, &holder)
    }
}

//! End-to-end tests over the public API.
//!
//! Every test starts from the same deployment: two tokens, a wrapped
//! native asset, a legacy exchange for the first token, a factory, a
//! router and a migrator.

#![allow(clippy::panic)]

use pairswap::config::ExchangeConfig;
use pairswap::domain::{Address, Amount, Event, FeeRatio, Shares, SwapPath, Timestamp};
use pairswap::error::AmmError;
use pairswap::ledger::Chain;
use pairswap::math::U256;
use pairswap::migrator::{MigrationRequest, Migrator};
use pairswap::pair::PRICE_RESOLUTION;
use pairswap::router::{
    quote_amount_in, quote_amount_out, AddLiquidityNative, Router, SwapExactIn,
};
use pairswap::traits::{FlashLoan, FlashSwap, FlashSwapCallee};

// ---------------------------------------------------------------------------
// Deployment fixture
// ---------------------------------------------------------------------------

const FUNDING: u128 = 1_000_000_000_000_000_000_000_000;

struct Deployment {
    chain: Chain,
    token_a: Address,
    token_b: Address,
    native: Address,
    legacy: Address,
    factory: Address,
    router: Router,
    migrator: Migrator,
    wallet: Address,
}

impl Deployment {
    fn new() -> Self {
        Self::with_config(ExchangeConfig::default())
    }

    /// A single locked share, so reserves as small as 1000/1000 can be
    /// seeded.
    fn small_lock() -> Self {
        let Ok(config) = ExchangeConfig::new(FeeRatio::STANDARD, Shares::new(1), 6) else {
            panic!("valid config");
        };
        Self::with_config(config)
    }

    fn with_config(config: ExchangeConfig) -> Self {
        let mut chain = Chain::new();
        let wallet = Address::from_label("wallet");
        let (Ok(token_a), Ok(token_b), Ok(native)) = (
            chain.deploy_asset("token-a"),
            chain.deploy_asset("token-b"),
            chain.deploy_wrapped_native(),
        ) else {
            panic!("assets");
        };
        let Ok(legacy) = chain.deploy_legacy_exchange(token_a) else {
            panic!("legacy exchange");
        };
        let Ok(factory) = chain.deploy_factory(wallet, config) else {
            panic!("factory");
        };
        let router = Router::new(Address::from_label("router"), factory, native);
        let migrator = Migrator::new(Address::from_label("migrator"), router);

        let assets = chain.assets_mut();
        let funded = [
            assets.issue(token_a, wallet, Amount::new(FUNDING)),
            assets.issue(token_b, wallet, Amount::new(FUNDING)),
            assets.credit_native(wallet, Amount::new(FUNDING)),
            assets.approve(token_a, wallet, router.address(), Amount::MAX),
            assets.approve(token_b, wallet, router.address(), Amount::MAX),
            assets.approve(token_a, wallet, legacy, Amount::MAX),
        ];
        if funded.iter().any(Result::is_err) {
            panic!("funding");
        }
        Self {
            chain,
            token_a,
            token_b,
            native,
            legacy,
            factory,
            router,
            migrator,
            wallet,
        }
    }

    fn create_pair(&mut self, x: Address, y: Address) -> Address {
        let Ok(pair) = self.chain.factory_mut(self.factory).and_then(|mut f| f.create_pair(x, y))
        else {
            panic!("create pair");
        };
        pair
    }

    /// Sends both amounts to the pair and mints to the wallet.
    fn deposit(&mut self, pair: Address, amounts: (u128, u128)) -> Result<Shares, AmmError> {
        let (a, b, wallet) = (self.token_a, self.token_b, self.wallet);
        self.chain.atomic(|chain| {
            chain.assets_mut().transfer(a, wallet, pair, Amount::new(amounts.0))?;
            chain.assets_mut().transfer(b, wallet, pair, Amount::new(amounts.1))?;
            chain.pair_mut(pair)?.mint(wallet, wallet)
        })
    }

    /// `(a-side, b-side)` in the pair's canonical order.
    fn canonical(&self, pair: Address, a_side: u128, b_side: u128) -> (Amount, Amount) {
        let Ok(state) = self.chain.pair(&pair) else {
            panic!("pair");
        };
        let sides = (Amount::new(a_side), Amount::new(b_side));
        let Ok(ordered) = state.tokens().orient(&self.token_a, sides) else {
            panic!("token a is in the pair");
        };
        ordered
    }

    fn reserves_ab(&self, pair: Address) -> (Amount, Amount) {
        let Ok(reserves) = self
            .chain
            .pair(&pair)
            .and_then(|p| p.reserves_for(&self.token_a))
        else {
            panic!("reserves");
        };
        reserves
    }

    fn balance(&self, token: Address, holder: Address) -> Amount {
        self.chain.assets().balance_of(&token, &holder)
    }

    fn path(&self, tokens: &[Address]) -> SwapPath {
        let Ok(path) = SwapPath::new(tokens.to_vec()) else {
            panic!("path");
        };
        path
    }
}

// ---------------------------------------------------------------------------
// Pair
// ---------------------------------------------------------------------------

#[test]
fn first_deposit_locks_minimum_shares() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    assert_eq!(d.deposit(pair, (1_000, 4_000)), Ok(Shares::new(1_000)));

    let Ok(state) = d.chain.pair(&pair) else {
        panic!("pair");
    };
    assert_eq!(state.total_shares(), Shares::new(2_000));
    assert_eq!(state.share_balance_of(&Address::ZERO), Shares::new(1_000));
    assert_eq!(state.share_balance_of(&d.wallet), Shares::new(1_000));
    assert_eq!(d.reserves_ab(pair), (Amount::new(1_000), Amount::new(4_000)));
}

#[test]
fn first_deposit_must_exceed_the_lock() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    assert_eq!(
        d.deposit(pair, (1_000, 1_000)),
        Err(AmmError::InsufficientLiquidityMinted)
    );
    assert_eq!(d.balance(d.token_a, pair), Amount::ZERO);
}

#[test]
fn textbook_swap_against_the_pair() {
    let mut d = Deployment::small_lock();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000, 1_000)) else {
        panic!("seed");
    };
    let (hundred, thousand) = (Amount::new(100), Amount::new(1_000));
    assert_eq!(
        quote_amount_out(hundred, thousand, thousand, FeeRatio::STANDARD),
        Ok(Amount::new(90))
    );

    let (a, wallet) = (d.token_a, d.wallet);
    let greedy = d.canonical(pair, 0, 91);
    let result = d.chain.atomic(|chain| {
        chain.assets_mut().transfer(a, wallet, pair, Amount::new(100))?;
        chain.pair_mut(pair)?.swap(wallet, greedy.0, greedy.1, wallet, None)
    });
    assert_eq!(result, Err(AmmError::InvariantViolation));
    assert_eq!(d.reserves_ab(pair), (Amount::new(1_000), Amount::new(1_000)));

    let fair = d.canonical(pair, 0, 90);
    let result = d.chain.atomic(|chain| {
        chain.assets_mut().transfer(a, wallet, pair, Amount::new(100))?;
        chain.pair_mut(pair)?.swap(wallet, fair.0, fair.1, wallet, None)
    });
    assert_eq!(result, Ok(()));
    assert_eq!(d.reserves_ab(pair), (Amount::new(1_100), Amount::new(910)));
}

#[test]
fn deposit_then_withdraw_is_not_profitable() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000_000, 3_000_000)) else {
        panic!("seed");
    };
    let (a, b, wallet) = (d.token_a, d.token_b, d.wallet);
    let (a_before, b_before) = (d.balance(a, wallet), d.balance(b, wallet));
    let Ok(minted) = d.deposit(pair, (333_333, 1_000_001)) else {
        panic!("deposit");
    };
    let burned = d.chain.atomic(|chain| {
        let mut handle = chain.pair_mut(pair)?;
        handle.transfer_shares(wallet, pair, minted)?;
        handle.burn(wallet, wallet)
    });
    assert!(burned.is_ok());
    assert!(d.balance(a, wallet) <= a_before);
    assert!(d.balance(b, wallet) <= b_before);
}

#[test]
fn accumulators_track_time_weighted_price() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000_000, 4_000_000)) else {
        panic!("seed");
    };
    let Ok(before) = d.chain.pair(&pair).map(|p| p.oracle().observe()) else {
        panic!("pair");
    };
    d.chain.advance(60);
    let Ok(()) = d.chain.pair_mut(pair).and_then(|mut p| p.sync()) else {
        panic!("sync");
    };
    let Ok(state) = d.chain.pair(&pair) else {
        panic!("pair");
    };
    let (reserve_a, reserve_b, _) = state.reserves();
    let Some((avg_a, avg_b)) = state.oracle().observe().average_since(&before) else {
        panic!("time elapsed");
    };
    let (ra, rb) = (U256::from(reserve_a.get()), U256::from(reserve_b.get()));
    assert_eq!(avg_a, (rb << PRICE_RESOLUTION) / ra);
    assert_eq!(avg_b, (ra << PRICE_RESOLUTION) / rb);
}

// ---------------------------------------------------------------------------
// Flash swaps
// ---------------------------------------------------------------------------

struct Borrower {
    repay_token: Address,
    repay: Amount,
    reenter: bool,
    seen: Option<Address>,
}

impl Borrower {
    fn new(repay_token: Address, repay: u128, reenter: bool) -> Self {
        Self {
            repay_token,
            repay: Amount::new(repay),
            reenter,
            seen: None,
        }
    }
}

impl FlashSwapCallee for Borrower {
    fn on_flash_swap(&mut self, chain: &mut Chain, loan: &FlashLoan<'_>) -> Result<(), AmmError> {
        self.seen = Some(loan.pair);
        if self.reenter {
            chain.pair_mut(loan.pair)?.sync()?;
        }
        let holder = Address::from_label("borrower");
        chain.assets_mut().transfer(self.repay_token, holder, loan.pair, self.repay)
    }
}

fn flash_borrow(
    d: &mut Deployment,
    pair: Address,
    borrower: &mut Borrower,
) -> Result<(), AmmError> {
    let holder = Address::from_label("borrower");
    let out = d.canonical(pair, 0, 1_000);
    let mut handle = d.chain.pair_mut(pair)?;
    handle.swap(holder, out.0, out.1, holder, Some(FlashSwap::new(borrower, b"loan")))
}

#[test]
fn flash_swap_must_repay_with_fee() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000_000, 1_000_000)) else {
        panic!("seed");
    };
    let (b, wallet, holder) = (d.token_b, d.wallet, Address::from_label("borrower"));
    let Ok(()) = d.chain.assets_mut().transfer(b, wallet, holder, Amount::new(10_000)) else {
        panic!("fund borrower");
    };

    let mut short = Borrower::new(b, 1_003, false);
    assert_eq!(flash_borrow(&mut d, pair, &mut short), Err(AmmError::InvariantViolation));
    assert_eq!(short.seen, Some(pair));
    assert_eq!(d.balance(b, holder), Amount::new(10_000));

    let mut sneaky = Borrower::new(b, 1_004, true);
    assert_eq!(flash_borrow(&mut d, pair, &mut sneaky), Err(AmmError::Reentrancy));

    let mut honest = Borrower::new(b, 1_004, false);
    assert_eq!(flash_borrow(&mut d, pair, &mut honest), Ok(()));
    // borrowed 1_000, repaid 1_004
    assert_eq!(d.balance(b, holder), Amount::new(9_996));
    assert_eq!(d.reserves_ab(pair), (Amount::new(1_000_000), Amount::new(1_000_004)));
    assert_eq!(d.chain.pair(&pair).map(|p| p.is_locked()), Ok(false));
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

#[test]
fn pair_creation_is_idempotent_in_either_order() {
    let mut d = Deployment::new();
    let (a, b) = (d.token_a, d.token_b);
    let Ok(predicted) = d.chain.factory(&d.factory).and_then(|f| f.pair_address_for(b, a)) else {
        panic!("derivation");
    };
    let pair = d.create_pair(a, b);
    assert_eq!(pair, predicted);
    assert_eq!(
        d.chain.factory_mut(d.factory).and_then(|mut f| f.create_pair(b, a)),
        Err(AmmError::PairExists)
    );
    assert_eq!(
        d.chain.factory_mut(d.factory).and_then(|mut f| f.create_pair(a, a)),
        Err(AmmError::IdenticalAddresses)
    );
    let Ok(factory) = d.chain.factory(&d.factory) else {
        panic!("factory");
    };
    assert_eq!(factory.get_pair(a, b), Some(pair));
    assert_eq!(factory.get_pair(b, a), Some(pair));
    assert_eq!(factory.all_pairs_length(), 1);
    assert!(matches!(
        d.chain.events().last(),
        Some(Event::PairCreated { pair_count: 1, .. })
    ));
}

#[test]
fn only_the_setter_switches_protocol_fee() {
    let mut d = Deployment::new();
    let stranger = Address::from_label("stranger");
    let treasury = Address::from_label("treasury");
    let Ok(mut factory) = d.chain.factory_mut(d.factory) else {
        panic!("factory");
    };
    assert_eq!(factory.set_fee_to(stranger, Some(treasury)), Err(AmmError::Forbidden));
    assert_eq!(factory.set_fee_to(d.wallet, Some(treasury)), Ok(()));
    assert_eq!(d.chain.factory(&d.factory).map(|f| f.fee_to()), Ok(Some(treasury)));
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn seed_native_pair(d: &mut Deployment, token: u128, native: u128) {
    let request = AddLiquidityNative {
        token: d.token_a,
        desired_token: Amount::new(token),
        native_value: Amount::new(native),
        min_token: Amount::ZERO,
        min_native: Amount::ZERO,
        recipient: d.wallet,
        deadline: Timestamp::NEVER,
    };
    let wallet = d.wallet;
    let Ok(_) = d.router.add_liquidity_native(&mut d.chain, wallet, &request) else {
        panic!("seed native pair");
    };
}

#[test]
fn expired_swap_issues_no_transfers() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000_000, 1_000_000)) else {
        panic!("seed");
    };
    d.chain.set_time(Timestamp::from_secs(1_000));
    let request = SwapExactIn {
        amount_in: Amount::new(100),
        amount_out_min: Amount::ZERO,
        path: d.path(&[d.token_a, d.token_b]),
        recipient: d.wallet,
        deadline: Timestamp::from_secs(999),
    };
    let events = d.chain.events().len();
    let before = (d.balance(d.token_a, d.wallet), d.balance(d.token_b, d.wallet));
    let wallet = d.wallet;
    assert_eq!(
        d.router.swap_exact_in(&mut d.chain, wallet, &request),
        Err(AmmError::Expired)
    );
    assert_eq!(d.chain.events().len(), events);
    assert_eq!((d.balance(d.token_a, wallet), d.balance(d.token_b, wallet)), before);
}

#[test]
fn failing_last_hop_reverts_whole_route() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000_000, 1_000_000)) else {
        panic!("seed");
    };
    let b_native = d.create_pair(d.token_b, d.native);
    let (b, native, wallet) = (d.token_b, d.native, d.wallet);
    let seeded = d.chain.atomic(|chain| {
        chain.assets_mut().transfer(b, wallet, b_native, Amount::new(1_000_000))?;
        chain.assets_mut().wrap(native, wallet, Amount::new(1_000_000))?;
        chain.assets_mut().transfer(native, wallet, b_native, Amount::new(1_000_000))?;
        chain.pair_mut(b_native)?.mint(wallet, wallet)
    });
    assert!(seeded.is_ok());

    // the last pair refuses to pay out to one of its own tokens
    let request = SwapExactIn {
        amount_in: Amount::new(10_000),
        amount_out_min: Amount::ZERO,
        path: d.path(&[d.token_a, b, native]),
        recipient: native,
        deadline: Timestamp::NEVER,
    };
    let before = d.reserves_ab(pair);
    assert_eq!(
        d.router.swap_exact_in(&mut d.chain, wallet, &request),
        Err(AmmError::InvalidRecipient)
    );
    assert_eq!(d.reserves_ab(pair), before);
    assert_eq!(d.balance(b, b_native), Amount::new(1_000_000));
}

#[test]
fn quotes_round_in_the_pools_favour() {
    let (r_in, r_out) = (Amount::new(1_000_000), Amount::new(3_600));
    for target in [1u128, 17, 900, 1_800, 3_000] {
        let wanted = Amount::new(target);
        let Ok(needed) = quote_amount_in(wanted, r_in, r_out, FeeRatio::STANDARD) else {
            panic!("inverse quote");
        };
        let Ok(got) = quote_amount_out(needed, r_in, r_out, FeeRatio::STANDARD) else {
            panic!("quote");
        };
        assert!(got >= wanted);
    }
}

// ---------------------------------------------------------------------------
// Migrator
// ---------------------------------------------------------------------------

#[test]
fn migration_refunds_unmatched_native() {
    let mut d = Deployment::new();
    seed_native_pair(&mut d, 1_000_000, 3_600);

    let (legacy, wallet, migrator) = (d.legacy, d.wallet, d.migrator.address());
    let deposited = d.chain.legacy_exchange_mut(legacy).and_then(|mut e| {
        e.add_liquidity(
            wallet,
            Amount::new(2_000),
            Shares::ZERO,
            Amount::new(500_000),
            Timestamp::NEVER,
        )?;
        e.approve_shares(wallet, migrator, Shares::new(2_000))
    });
    assert_eq!(deposited, Ok(()));
    let native_before = d.chain.assets().native_balance(&wallet);

    let request = MigrationRequest {
        token: d.token_a,
        min_token: Amount::new(500_000),
        min_native: Amount::new(1_800),
        recipient: wallet,
        deadline: Timestamp::NEVER,
    };
    let Ok(receipt) = d.migrator.migrate(&mut d.chain, wallet, &request) else {
        panic!("migrate");
    };
    assert_eq!(receipt.deposited_token, Amount::new(500_000));
    assert_eq!(receipt.deposited_native, Amount::new(1_800));
    assert_eq!(receipt.refunded_native, Amount::new(200));
    assert_eq!(receipt.refunded_token, Amount::ZERO);
    // 2_000 came out of the legacy exchange, 1_800 went into the pair
    assert_eq!(
        d.chain.assets().native_balance(&wallet),
        Amount::new(native_before.get() + 200)
    );
    assert!(matches!(d.chain.events().last(), Some(Event::Migrated { .. })));

    assert_eq!(
        d.migrator.migrate(&mut d.chain, wallet, &request),
        Err(AmmError::EmptyPosition)
    );
}

#[test]
fn migration_into_a_missing_pair_creates_it() {
    let mut d = Deployment::new();
    let (legacy, wallet, migrator) = (d.legacy, d.wallet, d.migrator.address());
    let deposited = d.chain.legacy_exchange_mut(legacy).and_then(|mut e| {
        e.add_liquidity(
            wallet,
            Amount::new(40_000),
            Shares::ZERO,
            Amount::new(10_000),
            Timestamp::NEVER,
        )?;
        e.approve_shares(wallet, migrator, Shares::new(u128::MAX))
    });
    assert_eq!(deposited, Ok(()));

    let request = MigrationRequest {
        token: d.token_a,
        min_token: Amount::ZERO,
        min_native: Amount::ZERO,
        recipient: wallet,
        deadline: Timestamp::NEVER,
    };
    let Ok(receipt) = d.migrator.migrate(&mut d.chain, wallet, &request) else {
        panic!("migrate");
    };
    assert_eq!(receipt.deposited_token, Amount::new(10_000));
    assert_eq!(receipt.deposited_native, Amount::new(40_000));
    assert_eq!(receipt.shares, Shares::new(19_000));
    let Ok(factory) = d.chain.factory(&d.factory) else {
        panic!("factory");
    };
    assert_eq!(factory.get_pair(d.native, d.token_a), Some(receipt.pair));
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

#[test]
fn event_log_serializes_for_indexers() {
    let mut d = Deployment::new();
    let pair = d.create_pair(d.token_a, d.token_b);
    let Ok(_) = d.deposit(pair, (1_000, 4_000)) else {
        panic!("seed");
    };
    let events = d.chain.take_events();
    assert!(d.chain.events().is_empty());
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            Event::PairCreated { .. } => "PairCreated",
            Event::Sync { .. } => "Sync",
            Event::Mint { .. } => "Mint",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["PairCreated", "Sync", "Mint"]);

    let Ok(json) = serde_json::to_string(&events) else {
        panic!("serialize");
    };
    assert!(json.starts_with("[{\"PairCreated\":{"));
    let Ok(back) = serde_json::from_str::<Vec<Event>>(&json) else {
        panic!("deserialize");
    };
    assert_eq!(back, events);
}

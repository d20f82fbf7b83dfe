//! Pair registry.
//!
//! A [`Factory`] owns the canonical-pair-to-address map and deploys pairs
//! on demand.  The router and migrator hold a factory *address* and look
//! pairs up through [`Chain::factory`](crate::ledger::Chain::factory), so
//! several independent registries can coexist on one chain.
//!
//! | Operation                  | Effect                                   |
//! |----------------------------|------------------------------------------|
//! | [`FactoryMut::create_pair`] | deploy + register, emits `PairCreated`   |
//! | [`Factory::get_pair`]       | lookup in either token order             |
//! | [`Factory::pair_address_for`] | deterministic address, no state needed |
//! | [`FactoryMut::set_fee_to`]  | protocol fee switch (setter only)        |

mod pair_factory;

pub use pair_factory::{Factory, FactoryMut};

//! # ac-04-marketplace
//!
//! Offers to transfer custody of a good, matched against the good's current
//! stage and holder, plus an append-only record of market transactions.
//!
//! ## Eligibility
//!
//! | Kind | Creator | Acceptor |
//! |------|---------|----------|
//! | Sell | current holder | role entering the next stage |
//! | Buy | role entering the next stage | current holder |
//! | Contract | either side | the other side |
//!
//! Consumed and deactivated goods are never tradeable. An offer remembers
//! the stage it was made at and cannot be accepted once the good moves on.
//!
//! ## Lifecycle
//!
//! `Open → Accepted | Expired | Cancelled`, leaving `Open` at most once.
//! Expiry is evaluated against the injected clock on access; there are no
//! timers. Acceptance never touches custody: the holder changes only when a
//! shipment is confirmed.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryMarketStore;
pub use domain::{
    buyer_role, can_take, creator_side, is_sellable, MarketConfig, MarketError, MarketResult,
    MarketStats, MarketTransaction, NewOffer, NewTransaction, Offer, OfferKind, OfferStatus, Side,
};
pub use ports::inbound::MarketApi;
pub use ports::outbound::MarketStore;
pub use service::MarketplaceEngine;

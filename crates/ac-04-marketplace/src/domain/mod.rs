//! Domain layer for the marketplace.

pub mod config;
pub mod eligibility;
pub mod entities;
pub mod errors;

pub use config::MarketConfig;
pub use eligibility::{buyer_role, can_take, creator_side, is_sellable};
pub use entities::{
    MarketStats, MarketTransaction, NewOffer, NewTransaction, Offer, OfferKind, OfferStatus, Side,
};
pub use errors::{MarketError, MarketResult};

//! # Inbound Ports (Driving Ports / API)

use crate::domain::{
    MarketResult, MarketStats, MarketTransaction, NewOffer, NewTransaction, Offer, OfferKind,
};
use shared_types::{ActorId, GoodId, OfferId};

/// Marketplace API.
///
/// Acceptance records agreement only; custody moves through logistics.
pub trait MarketApi: Send + Sync {
    fn create_offer(&self, caller: ActorId, request: NewOffer) -> MarketResult<Offer>;

    fn accept_offer(&self, caller: ActorId, offer_id: OfferId) -> MarketResult<Offer>;

    /// Creator only, while open.
    fn cancel_offer(&self, caller: ActorId, offer_id: OfferId) -> MarketResult<Offer>;

    /// Anyone may close an open offer that is past its expiry.
    fn expire_offer(&self, caller: ActorId, offer_id: OfferId) -> MarketResult<Offer>;

    /// Seller, buyer or an administrator.
    fn record_transaction(
        &self,
        caller: ActorId,
        request: NewTransaction,
    ) -> MarketResult<MarketTransaction>;

    fn get_offer(&self, offer_id: OfferId) -> Option<Offer>;

    fn offers_by_type(&self, kind: OfferKind) -> Vec<Offer>;

    /// Live offers the actor created or is the fixed counterparty of.
    fn open_offers_for(&self, actor: &ActorId) -> Vec<Offer>;

    fn offers_created_by(&self, actor: &ActorId) -> Vec<Offer>;

    fn transactions_for_good(&self, good_id: GoodId) -> Vec<MarketTransaction>;

    fn market_stats(&self) -> MarketStats;
}

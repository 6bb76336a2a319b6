//! # Outbound Ports (Driven Ports)

use crate::domain::{MarketTransaction, Offer};
use shared_types::{GoodId, OfferId};

/// Offer and transaction persistence.
///
/// Testing: `InMemoryMarketStore` (adapters/memory.rs)
pub trait MarketStore: Send + Sync {
    fn next_offer_id(&self) -> OfferId;

    fn get_offer(&self, id: OfferId) -> Option<Offer>;

    /// Insert or replace by id.
    fn put_offer(&mut self, offer: Offer);

    /// Every offer, in id order.
    fn offers(&self) -> Vec<Offer>;

    fn next_transaction_id(&self) -> u64;

    /// Transactions are append-only.
    fn push_transaction(&mut self, transaction: MarketTransaction);

    fn transactions_for_good(&self, good_id: GoodId) -> Vec<MarketTransaction>;

    fn transaction_count(&self) -> usize;

    /// Sum of price × quantity over every transaction.
    fn transaction_volume(&self) -> u128;
}

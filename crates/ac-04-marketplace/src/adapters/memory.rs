use crate::domain::{MarketTransaction, Offer};
use crate::ports::outbound::MarketStore;
use shared_types::{GoodId, OfferId};
use std::collections::{BTreeMap, HashMap};

/// In-memory market store for tests and single-process nodes.
#[derive(Debug, Default)]
pub struct InMemoryMarketStore {
    offers: BTreeMap<OfferId, Offer>,
    transactions: Vec<MarketTransaction>,
    by_good: HashMap<GoodId, Vec<usize>>,
    volume: u128,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarketStore for InMemoryMarketStore {
    fn next_offer_id(&self) -> OfferId {
        OfferId(self.offers.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn get_offer(&self, id: OfferId) -> Option<Offer> {
        self.offers.get(&id).cloned()
    }

    fn put_offer(&mut self, offer: Offer) {
        self.offers.insert(offer.id, offer);
    }

    fn offers(&self) -> Vec<Offer> {
        self.offers.values().cloned().collect()
    }

    fn next_transaction_id(&self) -> u64 {
        self.transactions.len() as u64 + 1
    }

    fn push_transaction(&mut self, transaction: MarketTransaction) {
        self.volume = self.volume.saturating_add(transaction.value());
        self.by_good
            .entry(transaction.good_id)
            .or_default()
            .push(self.transactions.len());
        self.transactions.push(transaction);
    }

    fn transactions_for_good(&self, good_id: GoodId) -> Vec<MarketTransaction> {
        self.by_good
            .get(&good_id)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|&i| self.transactions.get(i).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    fn transaction_volume(&self) -> u128 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ActorId;

    fn transaction(id: u64, good: u64, price: u64) -> MarketTransaction {
        MarketTransaction {
            id,
            good_id: GoodId(good),
            seller: ActorId::repeat(1),
            buyer: ActorId::repeat(2),
            price,
            quantity: 3,
            tag: "spot".into(),
            recorded_by: ActorId::repeat(1),
            recorded_at: 0,
        }
    }

    #[test]
    fn test_transactions_indexed_by_good() {
        let mut store = InMemoryMarketStore::new();
        store.push_transaction(transaction(1, 1, 10));
        store.push_transaction(transaction(2, 2, 20));
        store.push_transaction(transaction(3, 1, 30));
        let ids: Vec<u64> = store.transactions_for_good(GoodId(1)).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.transaction_volume(), 180);
        assert_eq!(store.next_transaction_id(), 4);
    }
}

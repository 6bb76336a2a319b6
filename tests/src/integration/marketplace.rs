//! Offer lifecycle across the marketplace and custody ledger.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_04_marketplace::{
        MarketApi, MarketError, NewOffer, NewTransaction, OfferKind, OfferStatus,
    };
    use ac_06_provenance::ProvenanceApi;
    use node_runtime::NodeError;
    use shared_types::{Classified, ErrorKind, GoodId};

    fn buy(good_id: GoodId, expiry_secs: u64) -> NewOffer {
        NewOffer {
            good_id,
            kind: OfferKind::Buy,
            price: 12_500,
            quantity: 40,
            terms: "FOB Mombasa".into(),
            expiry_secs,
            counterparty: None,
        }
    }

    #[test]
    fn test_accept_after_expiry_leaves_offer_open() {
        let h = Harness::new();
        let good = h.origin_good("LOT-200");
        let offer = h.node.create_offer(MILL, buy(good.id, 600)).unwrap();

        h.clock.advance(601);
        let entries = h.node.provenance().entry_count();
        let err = h.node.accept_offer(FARMER, offer.id).unwrap_err();
        assert!(matches!(err, NodeError::Market(MarketError::Expired { .. })));
        assert_eq!(err.kind(), ErrorKind::State);

        let stored = h.node.market().get_offer(offer.id).unwrap();
        assert_eq!(stored.status, OfferStatus::Open);
        assert_eq!(h.node.provenance().entry_count(), entries);

        let expired = h.node.expire_offer(OUTSIDER, offer.id).unwrap();
        assert_eq!(expired.status, OfferStatus::Expired);
        assert!(matches!(
            h.node.accept_offer(FARMER, offer.id),
            Err(NodeError::Market(MarketError::NotOpen { .. }))
        ));
    }

    #[test]
    fn test_offer_leaves_open_once() {
        let h = Harness::new();
        let good = h.origin_good("LOT-201");
        let offer = h.node.create_offer(MILL, buy(good.id, 3_600)).unwrap();

        let accepted = h.node.accept_offer(FARMER, offer.id).unwrap();
        assert_eq!(accepted.status, OfferStatus::Accepted);
        assert_eq!(accepted.acceptor, Some(FARMER));

        let entries = h.node.provenance().entry_count();
        assert!(h.node.accept_offer(FARMER, offer.id).is_err());
        assert!(h.node.cancel_offer(MILL, offer.id).is_err());
        assert!(h.node.expire_offer(MILL, offer.id).is_err());
        assert_eq!(h.node.provenance().entry_count(), entries);
        assert_eq!(h.node.market().market_stats().accepted, 1);
    }

    #[test]
    fn test_accepting_does_not_move_custody() {
        let h = Harness::new();
        let good = h.origin_good("LOT-202");
        let offer = h.node.create_offer(MILL, buy(good.id, 3_600)).unwrap();
        h.node.accept_offer(FARMER, offer.id).unwrap();
        let summary = shared_types::GoodView::good_summary(h.node.custody(), good.id).unwrap();
        assert_eq!(summary.holder, FARMER);
    }

    #[test]
    fn test_stage_change_invalidates_offer() {
        let h = Harness::new();
        let good = h.origin_good("LOT-203");
        let sell = NewOffer {
            kind: OfferKind::Sell,
            ..buy(good.id, 3_600)
        };
        let offer = h.node.create_offer(FARMER, sell).unwrap();
        h.advance_by(good.id, &[MILL]);

        assert!(matches!(
            h.node.accept_offer(MILL, offer.id),
            Err(NodeError::Market(MarketError::StageChanged { .. }))
        ));
    }

    #[test]
    fn test_ineligible_roles_cannot_trade() {
        let h = Harness::new();
        let good = h.origin_good("LOT-204");
        // Origin goods are bought by processors only.
        assert_eq!(
            h.node.create_offer(SHOP, buy(good.id, 3_600)).unwrap_err().kind(),
            ErrorKind::Authorization
        );
        let offer = h.node.create_offer(MILL, buy(good.id, 3_600)).unwrap();
        assert!(matches!(
            h.node.accept_offer(MILL, offer.id),
            Err(NodeError::Market(MarketError::OwnOffer { .. }))
        ));
        assert_eq!(
            h.node.accept_offer(DEPOT, offer.id).unwrap_err().kind(),
            ErrorKind::Authorization
        );
    }

    #[test]
    fn test_cancel_only_by_creator() {
        let h = Harness::new();
        let good = h.origin_good("LOT-205");
        let offer = h.node.create_offer(MILL, buy(good.id, 3_600)).unwrap();
        assert_eq!(
            h.node.cancel_offer(FARMER, offer.id).unwrap_err().kind(),
            ErrorKind::Authorization
        );
        let cancelled = h.node.cancel_offer(MILL, offer.id).unwrap();
        assert_eq!(cancelled.status, OfferStatus::Cancelled);
        assert!(h.node.market().open_offers_for(&MILL).is_empty());
    }

    #[test]
    fn test_transactions_feed_stats() {
        let h = Harness::new();
        let good = h.origin_good("LOT-206");
        for price in [1_000, 3_000] {
            h.node
                .record_transaction(
                    FARMER,
                    NewTransaction {
                        good_id: good.id,
                        seller: FARMER,
                        buyer: MILL,
                        price,
                        quantity: 2,
                        tag: "spot".into(),
                    },
                )
                .unwrap();
        }
        let stats = h.node.market().market_stats();
        assert_eq!(stats.transactions, 2);
        assert_eq!(stats.volume, 8_000);
        assert_eq!(h.node.market().transactions_for_good(good.id).len(), 2);
    }
}

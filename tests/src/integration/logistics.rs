//! Shipments and the custody handover at confirmation.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_03_custody_ledger::{CustodyApi, CustodyError};
    use ac_04_marketplace::{NewOffer, OfferKind};
    use ac_05_logistics::{LogisticsApi, LogisticsError, NewShipment, ShipmentStatus, StatusUpdate};
    use ac_06_provenance::ProvenanceApi;
    use node_runtime::NodeError;
    use shared_types::{ActorId, AuditScope, Classified, ErrorKind, GoodId, OfferId, ShipmentId, Stage};

    fn shipment(
        good_id: GoodId,
        receiver: ActorId,
        carrier: Option<ActorId>,
        code: &str,
    ) -> NewShipment {
        NewShipment {
            good_id,
            offer_id: None,
            receiver,
            carrier,
            tracking_code: code.to_string(),
            origin: "Nyeri".into(),
            destination: "Thika".into(),
            metadata_ref: None,
        }
    }

    fn step(h: &Harness, caller: ActorId, id: ShipmentId, next: ShipmentStatus) {
        h.node
            .advance_shipment(caller, id, next, StatusUpdate::new(next.as_str()).at("A2 highway"))
            .unwrap();
    }

    #[test]
    fn test_self_delivery_pickup_then_early_confirm() {
        let h = Harness::new();
        let good = h.origin_good("LOT-300");
        let created = h
            .node
            .create_shipment(FARMER, shipment(good.id, MILL, None, "TRK-300"))
            .unwrap();

        step(&h, FARMER, created.id, ShipmentStatus::PickedUp);

        let err = h.node.confirm_delivery(MILL, created.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert!(matches!(
            err,
            NodeError::Logistics(LogisticsError::InvalidTransition {
                from: ShipmentStatus::PickedUp,
                ..
            })
        ));
        assert_eq!(h.node.custody().get_good(good.id).unwrap().holder, FARMER);
        assert_eq!(
            h.node.logistics().shipment_detail(created.id).unwrap().status,
            ShipmentStatus::PickedUp
        );
    }

    #[test]
    fn test_advance_to_confirmed_leaves_custody_with_confirm_delivery() {
        let h = Harness::new();
        let good = h.origin_good("LOT-310");
        let created = h
            .node
            .create_shipment(FARMER, shipment(good.id, MILL, None, "TRK-310"))
            .unwrap();
        for next in [
            ShipmentStatus::PickedUp,
            ShipmentStatus::InTransit,
            ShipmentStatus::Delivered,
        ] {
            step(&h, FARMER, created.id, next);
        }

        let err = h
            .node
            .advance_shipment(
                MILL,
                created.id,
                ShipmentStatus::Confirmed,
                StatusUpdate::new("received"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            h.node.logistics().shipment_detail(created.id).unwrap().status,
            ShipmentStatus::Delivered
        );
        assert_eq!(h.node.custody().get_good(good.id).unwrap().holder, FARMER);

        let moved = h.node.confirm_delivery(MILL, created.id).unwrap();
        assert_eq!(moved.holder, MILL);
        assert_eq!(
            h.node.logistics().shipment_detail(created.id).unwrap().status,
            ShipmentStatus::Confirmed
        );
    }

    #[test]
    fn test_confirmation_hands_over_custody() {
        let h = Harness::new();
        let good = h.origin_good("LOT-301");
        let created = h
            .node
            .create_shipment(FARMER, shipment(good.id, MILL, Some(TRUCK), "TRK-301"))
            .unwrap();
        for next in [
            ShipmentStatus::PickedUp,
            ShipmentStatus::InTransit,
            ShipmentStatus::Delivered,
        ] {
            step(&h, TRUCK, created.id, next);
        }
        assert_eq!(
            h.node.confirm_delivery(TRUCK, created.id).unwrap_err().kind(),
            ErrorKind::Authorization
        );

        let received = h.node.confirm_delivery(MILL, created.id).unwrap();
        assert_eq!(received.holder, MILL);
        assert_eq!(received.stage, Stage::Origin);

        let detail = h.node.logistics().shipment_detail(created.id).unwrap();
        assert_eq!(detail.status, ShipmentStatus::Confirmed);
        assert_eq!(detail.checkpoints.len(), 5);

        let operations: Vec<String> = h
            .node
            .provenance()
            .entries_for(&AuditScope::Good(good.id))
            .iter()
            .map(|e| e.operation.clone())
            .collect();
        assert_eq!(operations.last().map(String::as_str), Some("custody_transfer"));
        assert!(h
            .node
            .provenance()
            .verify_chain(&AuditScope::Good(good.id))
            .intact);

        // The receiver now holds the good and advances it.
        assert_eq!(h.advance_by(good.id, &[MILL]).stage, Stage::Processing);
    }

    #[test]
    fn test_holder_change_blocks_confirmation() {
        let h = Harness::new();
        let good = h.origin_good("LOT-302");
        let created = h
            .node
            .create_shipment(FARMER, shipment(good.id, DEPOT, None, "TRK-302"))
            .unwrap();
        step(&h, FARMER, created.id, ShipmentStatus::PickedUp);
        step(&h, FARMER, created.id, ShipmentStatus::InTransit);
        step(&h, FARMER, created.id, ShipmentStatus::Delivered);

        // Custody moves elsewhere while the goods are on the road.
        h.advance_by(good.id, &[MILL]);

        let err = h.node.confirm_delivery(DEPOT, created.id).unwrap_err();
        assert!(matches!(
            err,
            NodeError::Custody(CustodyError::HolderMismatch { holder: MILL, .. })
        ));
        assert_eq!(
            h.node.logistics().shipment_detail(created.id).unwrap().status,
            ShipmentStatus::Delivered
        );
    }

    #[test]
    fn test_shipment_linked_to_accepted_offer() {
        let h = Harness::new();
        let good = h.origin_good("LOT-303");
        let offer = h
            .node
            .create_offer(
                MILL,
                NewOffer {
                    good_id: good.id,
                    kind: OfferKind::Buy,
                    price: 9_000,
                    quantity: 1,
                    terms: String::new(),
                    expiry_secs: 3_600,
                    counterparty: Some(FARMER),
                },
            )
            .unwrap();

        let linked = |receiver, code: &str| NewShipment {
            offer_id: Some(offer.id),
            ..shipment(good.id, receiver, None, code)
        };
        assert!(matches!(
            h.node.create_shipment(FARMER, linked(MILL, "TRK-303")),
            Err(NodeError::Logistics(LogisticsError::OfferNotSettled { .. }))
        ));

        h.node.accept_offer(FARMER, offer.id).unwrap();
        assert!(matches!(
            h.node.create_shipment(FARMER, linked(DEPOT, "TRK-303")),
            Err(NodeError::Logistics(LogisticsError::OfferMismatch { .. }))
        ));
        assert!(matches!(
            h.node.create_shipment(
                FARMER,
                NewShipment {
                    offer_id: Some(OfferId(77)),
                    ..shipment(good.id, MILL, None, "TRK-304")
                }
            ),
            Err(NodeError::Logistics(LogisticsError::OfferNotFound { .. }))
        ));
        let created = h.node.create_shipment(FARMER, linked(MILL, "TRK-303")).unwrap();
        assert_eq!(created.offer_id, Some(offer.id));
    }

    #[test]
    fn test_shipment_queries() {
        let h = Harness::new();
        let good = h.origin_good("LOT-305");
        let created = h
            .node
            .create_shipment(FARMER, shipment(good.id, MILL, Some(TRUCK), "TRK-305"))
            .unwrap();
        assert_eq!(h.node.logistics().shipments_for_actor(&TRUCK, None).len(), 1);
        assert!(h
            .node
            .logistics()
            .shipments_for_actor(&TRUCK, Some(ShipmentStatus::InTransit))
            .is_empty());
        assert_eq!(
            h.node.logistics().by_tracking_code("TRK-305").map(|s| s.id),
            Some(created.id)
        );
        assert_eq!(h.node.logistics().shipments_for_good(good.id).len(), 1);
    }
}

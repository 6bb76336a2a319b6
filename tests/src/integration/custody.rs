//! Stage journeys, condition alerts and bulk queries.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_03_custody_ledger::{Alert, Attestation, BatchEntry, CustodyApi, CustodyError};
    use node_runtime::{NodeConfig, NodeError};
    use shared_types::{Classified, ConditionKind, ErrorKind, GoodId, Stage};

    #[test]
    fn test_full_journey_to_consumption() {
        let h = Harness::new();
        let good = h.origin_good("LOT-100");
        let retail = h.advance_by(good.id, &[MILL, DEPOT, SHOP]);
        assert_eq!(retail.stage, Stage::Retail);
        assert_eq!(retail.holder, SHOP);

        let consumed = h.node.mark_consumed(OUTSIDER, good.id).unwrap();
        assert_eq!(consumed.stage, Stage::Consumed);
        assert_eq!(consumed.stage_path(), Stage::LIFECYCLE.to_vec());

        let journey = h.node.custody().get_journey(good.id).unwrap();
        let actors: Vec<_> = journey.iter().map(|r| r.actor).collect();
        assert_eq!(actors, vec![FARMER, MILL, DEPOT, SHOP, OUTSIDER]);

        let stats = h.node.custody().supply_chain_stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.count(Stage::Consumed), 1);
        assert!(h.node.custody().goods_held_by(&SHOP).is_empty());
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let h = Harness::new();
        let good = h.origin_good("LOT-101");
        let err = h
            .node
            .advance_good(SHOP, good.id, Attestation::new("shelved"))
            .unwrap_err();
        assert!(matches!(
            err,
            NodeError::Custody(CustodyError::InvalidTransition {
                from: Stage::Origin,
                to: Stage::Retail,
                ..
            })
        ));
        assert!(matches!(
            h.node.mark_consumed(SHOP, good.id),
            Err(NodeError::Custody(CustodyError::InvalidState { .. }))
        ));
    }

    #[test]
    fn test_deactivation_is_terminal() {
        let h = Harness::new();
        let good = h.origin_good("LOT-102");
        assert_eq!(
            h.node.deactivate_good(MILL, good.id).unwrap_err().kind(),
            ErrorKind::Authorization
        );
        let deactivated = h.node.deactivate_good(FARMER, good.id).unwrap();
        assert_eq!(deactivated.stage_path(), vec![Stage::Origin, Stage::Deactivated]);

        let err = h
            .node
            .advance_good(MILL, good.id, Attestation::new("milled"))
            .unwrap_err();
        assert!(matches!(err, NodeError::Custody(CustodyError::GoodDeactivated { .. })));
        assert_eq!(h.node.custody().supply_chain_stats().active, 0);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let h = Harness::new();
        let first = h.origin_good("LOT-103");
        let err = h
            .node
            .register_good(
                FARMER,
                ac_03_custody_ledger::NewGood {
                    name: "Robusta".into(),
                    code: "LOT-103".into(),
                    attestation: Attestation::new("harvested"),
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Uniqueness);
        assert_eq!(
            h.node.custody().get_by_code("LOT-103").map(|g| g.id),
            Some(first.id)
        );
    }

    #[test]
    fn test_out_of_band_conditions_raise_alerts() {
        let mut config = NodeConfig::default();
        config
            .conditions
            .static_values
            .insert(ConditionKind::Temperature, 41.5);
        let h = Harness::with_config(config);

        let good = h.origin_good("LOT-104");
        let alerts = &good.records[0].alerts;
        assert!(alerts
            .iter()
            .any(|a| matches!(a, Alert::TemperatureOutOfBand { value, .. } if *value == 41.5)));
        // Alerts are advisory.
        assert_eq!(good.stage, Stage::Origin);
    }

    #[test]
    fn test_estimate_jump_raises_alert() {
        let h = Harness::new();
        let good = h.origin_good("LOT-105");
        let advanced = h
            .node
            .advance_good(MILL, good.id, Attestation::new("milled").with_estimate(150.0))
            .unwrap();
        let record = advanced.records.last().unwrap();
        assert!(record
            .alerts
            .iter()
            .any(|a| matches!(a, Alert::EstimateDeviation { previous, .. } if *previous == 100.0)));
    }

    #[test]
    fn test_batch_keeps_positions() {
        let h = Harness::new();
        let mine = h.origin_good("LOT-106");
        let theirs = h.origin_good("LOT-107");
        h.advance_by(theirs.id, &[MILL]);

        let batch = h
            .node
            .get_batch(&MILL, &[mine.id, GoodId(999), theirs.id]);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], BatchEntry::Placeholder { id: mine.id });
        assert_eq!(batch[1], BatchEntry::Placeholder { id: GoodId(999) });
        assert_eq!(batch[2].good().map(|g| g.id), Some(theirs.id));

        let producer_view = h.node.get_all_viewable(&FARMER);
        assert_eq!(producer_view.len(), 2);
        assert!(producer_view.iter().all(|e| !e.is_placeholder()));

        let admin_view = h.node.get_all_viewable(&h.admin);
        assert!(admin_view.iter().all(|e| !e.is_placeholder()));
    }
}

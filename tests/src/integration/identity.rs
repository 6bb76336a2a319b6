//! Registration, standing and who may move goods.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_01_identity_registry::{IdentityApi, IdentityError};
    use ac_03_custody_ledger::{Attestation, CustodyApi};
    use ac_04_marketplace::{NewOffer, OfferKind};
    use node_runtime::{NodeConfig, NodeError};
    use shared_types::{ActorId, Classified, Denied, ErrorKind, Role, Stage};

    const LATE_MILL: ActorId = ActorId::repeat(0x22);

    #[test]
    fn test_stage_authorization_scenario() {
        let h = Harness::new();
        let good = h.origin_good("LOT-001");

        // Processor that was never registered.
        let err = h
            .node
            .advance_good(LATE_MILL, good.id, Attestation::new("milled"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(matches!(
            err,
            NodeError::Custody(ac_03_custody_ledger::CustodyError::Denied(
                Denied::Unregistered { .. }
            ))
        ));

        // Producer holds no stage-advancing role.
        let err = h
            .node
            .advance_good(FARMER, good.id, Attestation::new("milled"))
            .unwrap_err();
        assert!(matches!(
            err,
            NodeError::Custody(ac_03_custody_ledger::CustodyError::Denied(Denied::WrongRole {
                actual: Role::Producer,
                ..
            }))
        ));

        h.register(LATE_MILL, Role::Processor);
        let advanced = h
            .node
            .advance_good(LATE_MILL, good.id, Attestation::new("milled"))
            .unwrap();
        assert_eq!(advanced.stage, Stage::Processing);
        assert_eq!(advanced.holder, LATE_MILL);
    }

    #[test]
    fn test_duplicate_license_keeps_one_actor() {
        let h = Harness::bare(NodeConfig::default());
        let first = Harness::actor_request(MILL, Role::Processor, "KE-PROC-77");
        let second = Harness::actor_request(DEPOT, Role::Distributor, "KE-PROC-77");

        h.node.register_actor(h.admin, first).unwrap();
        let before = h.node.identity().actor_count();
        let err = h.node.register_actor(h.admin, second).unwrap_err();

        assert!(matches!(
            err,
            NodeError::Identity(IdentityError::DuplicateLicense { holder: MILL, .. })
        ));
        assert_eq!(h.node.identity().actor_count(), before);
        assert_eq!(
            h.node.identity().actor_by_license("KE-PROC-77").map(|a| a.id),
            Some(MILL)
        );
        assert!(h.node.identity().get_actor(&DEPOT).is_none());
    }

    #[test]
    fn test_only_administrators_register() {
        let h = Harness::new();
        let err = h
            .node
            .register_actor(FARMER, Harness::actor_request(OUTSIDER, Role::Producer, "KE-9"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(h.node.identity().get_actor(&OUTSIDER).is_none());
    }

    #[test]
    fn test_blacklisted_actor_is_locked_out() {
        let h = Harness::new();
        let good = h.origin_good("LOT-002");
        h.node.blacklist_actor(h.admin, MILL).unwrap();

        let advance = h
            .node
            .advance_good(MILL, good.id, Attestation::new("milled"))
            .unwrap_err();
        assert!(matches!(
            advance,
            NodeError::Custody(ac_03_custody_ledger::CustodyError::Denied(
                Denied::Blacklisted { .. }
            ))
        ));
        let offer = h
            .node
            .create_offer(
                MILL,
                NewOffer {
                    good_id: good.id,
                    kind: OfferKind::Buy,
                    price: 500,
                    quantity: 10,
                    terms: String::new(),
                    expiry_secs: 3_600,
                    counterparty: None,
                },
            )
            .unwrap_err();
        assert_eq!(offer.kind(), ErrorKind::Authorization);

        h.node.unblacklist_actor(h.admin, MILL).unwrap();
        assert!(h
            .node
            .advance_good(MILL, good.id, Attestation::new("milled"))
            .is_ok());
        assert_eq!(
            h.node.custody().get_good(good.id).map(|g| g.stage),
            Some(Stage::Processing)
        );
    }

    #[test]
    fn test_deactivated_actor_can_be_reactivated() {
        let h = Harness::new();
        let good = h.origin_good("LOT-003");
        h.node.deactivate_actor(h.admin, MILL).unwrap();
        assert_eq!(
            h.node
                .advance_good(MILL, good.id, Attestation::new("milled"))
                .unwrap_err()
                .kind(),
            ErrorKind::Authorization
        );
        h.node.reactivate_actor(h.admin, MILL).unwrap();
        h.advance_by(good.id, &[MILL]);
    }

    #[test]
    fn test_role_reassignment_changes_target_stage() {
        let h = Harness::new();
        let good = h.origin_good("LOT-004");
        h.node.reassign_role(h.admin, DEPOT, Role::Processor).unwrap();
        let advanced = h.advance_by(good.id, &[DEPOT]);
        assert_eq!(advanced.stage, Stage::Processing);
        assert_eq!(h.node.identity().list_by_role(Role::Processor).len(), 2);
    }
}

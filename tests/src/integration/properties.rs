//! Randomized operation sequences against ledger-wide invariants.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_01_identity_registry::IdentityApi;
    use ac_03_custody_ledger::{Attestation, CustodyApi};
    use ac_06_provenance::ProvenanceApi;
    use node_runtime::NodeConfig;
    use proptest::prelude::*;
    use shared_types::{ActorId, AuditScope, Role, Stage};
    use std::collections::HashMap;

    const CAST: [ActorId; 6] = [FARMER, MILL, DEPOT, TRUCK, SHOP, OUTSIDER];

    #[derive(Debug, Clone)]
    enum GoodOp {
        Advance(usize),
        Deactivate(usize),
        Consume(usize),
    }

    fn arb_good_op() -> impl Strategy<Value = GoodOp> {
        prop_oneof![
            3 => (0..CAST.len()).prop_map(GoodOp::Advance),
            1 => (0..CAST.len()).prop_map(GoodOp::Deactivate),
            1 => (0..CAST.len()).prop_map(GoodOp::Consume),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// No two registered actors ever share a license.
        #[test]
        fn license_is_injective(attempts in prop::collection::vec((0x20u8..0x30, 0usize..4), 1..24)) {
            let h = Harness::bare(NodeConfig::default());
            let mut owners: HashMap<String, ActorId> = HashMap::new();

            for (byte, license) in attempts {
                let id = ActorId::repeat(byte);
                let license = format!("KE-{license}");
                let result = h.node.register_actor(
                    h.admin,
                    Harness::actor_request(id, Role::Producer, &license),
                );
                let fresh = !owners.contains_key(&license)
                    && !owners.values().any(|owner| *owner == id);
                prop_assert_eq!(result.is_ok(), fresh);
                if fresh {
                    owners.insert(license, id);
                }
            }

            prop_assert_eq!(h.node.identity().actor_count(), owners.len() + 1);
            for (license, owner) in &owners {
                let found = h.node.identity().actor_by_license(license).map(|a| a.id);
                prop_assert_eq!(found, Some(*owner));
            }
        }

        /// Whatever is attempted, a good's path is a prefix of the lifecycle
        /// or origin followed by deactivation, and its chain stays intact.
        #[test]
        fn stage_path_is_a_prefix(ops in prop::collection::vec(arb_good_op(), 0..16)) {
            let h = Harness::new();
            let good = h.origin_good("LOT-700");
            let mut commits = 1;

            for op in ops {
                let outcome = match op {
                    GoodOp::Advance(i) => h
                        .node
                        .advance_good(CAST[i], good.id, Attestation::new("handled"))
                        .map(|_| ()),
                    GoodOp::Deactivate(i) => h.node.deactivate_good(CAST[i], good.id).map(|_| ()),
                    GoodOp::Consume(i) => h.node.mark_consumed(CAST[i], good.id).map(|_| ()),
                };
                if outcome.is_ok() {
                    commits += 1;
                }
            }

            let current = h.node.custody().get_good(good.id).unwrap();
            let path = current.stage_path();
            let deactivated = [Stage::Origin, Stage::Deactivated];
            prop_assert!(
                Stage::LIFECYCLE.starts_with(&path) || path == deactivated,
                "unexpected path {:?}",
                path
            );
            prop_assert_eq!(path.last().copied(), Some(current.stage));

            let report = h.node.provenance().verify_chain(&AuditScope::Good(good.id));
            prop_assert!(report.intact);
            prop_assert_eq!(report.entry_count, commits);
        }
    }
}

//! Hash chains, tamper evidence, verification tokens and object references.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_03_custody_ledger::{Attestation, NewGood};
    use ac_06_provenance::{ProvenanceApi, ProvenanceError, VerificationApi};
    use ac_07_object_references::{FileKind, ObjectError, ObjectReferenceApi, UploadOutcome};
    use node_runtime::{NodeConfig, NodeError};
    use shared_types::{sha256, AuditScope, Classified, ErrorKind, Role, Stage};

    #[test]
    fn test_every_commit_extends_an_intact_chain() {
        let h = Harness::new();
        let good = h.origin_good("LOT-400");
        h.advance_by(good.id, &[MILL, DEPOT]);

        let scope = AuditScope::Good(good.id);
        let entries = h.node.provenance().entries_for(&scope);
        let operations: Vec<&str> = entries.iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(operations, vec!["register", "advance", "advance"]);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.sequence, i as u64);
        }

        let report = h.node.provenance().verify_chain(&scope);
        assert!(report.intact);
        assert_eq!(report.entry_count, 3);
        assert_eq!(report.head, entries.last().map(|e| e.entry_hash));

        // A holder's copy of the history checks out against the ledger.
        assert!(h.node.provenance().verify_claim(&entries).is_authentic());
    }

    #[test]
    fn test_tampered_payload_breaks_chain() {
        let h = Harness::new();
        let good = h.origin_good("LOT-401");
        h.advance_by(good.id, &[MILL]);
        let scope = AuditScope::Good(good.id);
        let honest = h.node.provenance().entries_for(&scope);

        assert!(h.node.provenance().tamper_payload(&scope, 0, 3));

        let report = h.node.provenance().verify_chain(&scope);
        assert!(!report.intact);
        assert_eq!(report.first_mismatch.map(|m| m.sequence), Some(0));
        assert!(!h.node.provenance().verify_claim(&honest).is_authentic());
        assert!(!h.node.provenance().tamper_payload(&scope, 9, 0));
    }

    #[test]
    fn test_token_lifecycle() {
        let h = Harness::new();
        let good = h.origin_good("LOT-402");
        h.advance_by(good.id, &[MILL]);

        assert!(matches!(
            h.node.issue_token(FARMER, good.id),
            Err(NodeError::Provenance(ProvenanceError::Denied(_)))
        ));
        let token = h.node.issue_token(MILL, good.id).unwrap();
        assert!(token.active);

        let report = h.node.verification().verify_token(&token.code).unwrap();
        assert!(report.valid);
        assert!(report.chain_intact);
        assert_eq!(report.good_id, good.id);
        assert_eq!(report.stage_count, 2);
        assert_eq!(report.snapshot.map(|s| s.stage), Some(Stage::Processing));

        let outsider = h.node.deactivate_token(DEPOT, &token.code).unwrap_err();
        assert_eq!(outsider.kind(), ErrorKind::Authorization);
        let revoked = h.node.deactivate_token(MILL, &token.code).unwrap();
        assert!(!revoked.active);
        assert!(matches!(
            h.node.deactivate_token(MILL, &token.code),
            Err(NodeError::Provenance(ProvenanceError::AlreadyInactive { .. }))
        ));

        let report = h.node.verification().verify_token(&token.code).unwrap();
        assert!(!report.valid);
        assert!(!report.token_active);
        assert!(report.chain_intact);

        assert!(matches!(
            h.node.verification().verify_token("not-a-code"),
            Err(ProvenanceError::TokenNotFound { .. })
        ));
    }

    #[test]
    fn test_token_reports_tampering() {
        let h = Harness::new();
        let good = h.origin_good("LOT-403");
        let token = h.node.issue_token(FARMER, good.id).unwrap();
        assert!(h.node.verification().verify_token(&token.code).unwrap().valid);

        h.node
            .provenance()
            .tamper_payload(&AuditScope::Good(good.id), 0, 3);

        let report = h.node.verification().verify_token(&token.code).unwrap();
        assert!(report.token_active);
        assert!(!report.chain_intact);
        assert!(!report.valid);
        assert!(report.first_mismatch.is_some());
    }

    #[test]
    fn test_exhaustion_halts_every_subsystem() {
        let mut config = NodeConfig::default();
        config.provenance.max_entries = 20;
        let h = Harness::with_config(config);

        let mut failure = None;
        for i in 0..30 {
            let request = NewGood {
                name: "Maize".into(),
                code: format!("LOT-5{i:02}"),
                attestation: Attestation::new("harvested"),
            };
            if let Err(err) = h.node.register_good(FARMER, request) {
                failure = Some(err);
                break;
            }
        }
        let failure = failure.expect("capacity is reached");
        assert_eq!(failure.kind(), ErrorKind::Fatal);
        assert!(h.node.provenance().is_halted());
        assert_eq!(h.node.provenance().entry_count(), 20);

        let later = h
            .node
            .register_actor(h.admin, Harness::actor_request(OUTSIDER, Role::Retailer, "LIC-X"))
            .unwrap_err();
        assert_eq!(later.kind(), ErrorKind::Fatal);
        assert_eq!(h.node.provenance().entry_count(), 20);
    }

    #[test]
    fn test_upload_flow_through_node() {
        let mut config = NodeConfig::default();
        config.objects.operators = vec![OUTSIDER];
        let h = Harness::with_config(config);
        let good = h.origin_good("LOT-404");
        let hash = sha256(b"lab report pdf");

        let id = h
            .node
            .request_upload(FARMER, good.id, hash, FileKind::LabReport, Stage::Origin)
            .unwrap();
        assert!(matches!(
            h.node
                .request_upload(FARMER, good.id, hash, FileKind::Image, Stage::Processing),
            Err(NodeError::Objects(ObjectError::InvalidInput { .. }))
        ));
        assert!(h.node.objects().attachments_for_good(good.id).is_empty());

        assert_eq!(
            h.node
                .report_upload_result(MILL, id, UploadOutcome::Completed {
                    reference: "ipfs://bafy".into()
                })
                .unwrap_err()
                .kind(),
            ErrorKind::Authorization
        );
        let done = h
            .node
            .report_upload_result(OUTSIDER, id, UploadOutcome::Completed {
                reference: "ipfs://bafy".into(),
            })
            .unwrap();
        assert_eq!(done.reference(), Some("ipfs://bafy"));
        assert!(matches!(
            h.node.report_upload_result(h.admin, id, UploadOutcome::Failed {
                error: "late".into()
            }),
            Err(NodeError::Objects(ObjectError::AlreadyResolved { .. }))
        ));

        let integrity = h.node.objects().verify_integrity(id, &hash).unwrap();
        assert!(integrity.is_intact());
        assert!(!h
            .node
            .objects()
            .verify_integrity(id, &sha256(b"other file"))
            .unwrap()
            .is_intact());
        assert_eq!(h.node.objects().attachments_for_good(good.id).len(), 1);

        let operations: Vec<String> = h
            .node
            .provenance()
            .entries_for(&AuditScope::Good(good.id))
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert!(operations.contains(&"request_upload".to_string()));
        assert!(operations.contains(&"report_upload_result".to_string()));
    }
}

//! Commit notifications: live subscriptions and the pull outbox.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use ac_06_provenance::ProvenanceApi;
    use parking_lot::Mutex;
    use shared_bus::{EventFilter, EventTopic};
    use shared_types::{AuditScope, EntityRef, Role};
    use std::time::Duration;

    #[tokio::test]
    async fn test_subscription_sees_commits_in_order() {
        let h = Harness::new();
        let mut events = h.node.subscribe(EventFilter::all());

        let good = h.origin_good("LOT-600");
        h.advance_by(good.id, &[MILL]);
        h.node.issue_token(MILL, good.id).unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
                .await
                .expect("event arrives")
                .expect("bus open");
            seen.push(event);
        }
        let operations: Vec<&str> = seen.iter().map(|e| e.operation()).collect();
        assert_eq!(operations, vec!["register", "advance", "issue_token"]);
        assert!(seen.windows(2).all(|w| w[1].global_index == w[0].global_index + 1));
        assert!(seen.iter().all(|e| e.scope == AuditScope::Good(good.id)));

        // Event hashes are the provenance entry hashes.
        let entries = h.node.provenance().entries_for(&AuditScope::Good(good.id));
        let hashes: Vec<_> = entries.iter().map(|e| e.entry_hash).collect();
        assert_eq!(hashes, seen.iter().map(|e| e.entry_hash).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_filtered_subscription() {
        let h = Harness::new();
        let mut custody = h.node.subscribe(EventFilter::topics(vec![EventTopic::Custody]));

        h.register(OUTSIDER, Role::Retailer);
        let good = h.origin_good("LOT-601");

        let event = tokio::time::timeout(Duration::from_secs(1), custody.recv())
            .await
            .expect("event arrives")
            .expect("bus open");
        assert_eq!(event.topic(), EventTopic::Custody);
        assert_eq!(event.entity(), &EntityRef::Good(good.id));
        assert!(custody.try_recv().unwrap().is_none());
    }

    #[test]
    fn test_outbox_replay() {
        let h = Harness::new();
        let bus = h.node.event_bus();
        let before = bus.outbox_len();
        assert_eq!(before, h.node.provenance().entry_count());

        let good = h.origin_good("LOT-602");
        h.advance_by(good.id, &[MILL]);

        let tail = bus.events_since(before as u64);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].operation(), "register");

        let replay = bus.query(&EventFilter::scopes(vec![AuditScope::Good(good.id)]));
        assert_eq!(replay, tail);
        assert_eq!(
            bus.query(&EventFilter::topics(vec![EventTopic::Identity])).len(),
            6,
            "bootstrap administrator plus the cast"
        );
    }

    #[test]
    fn test_concurrent_commits_keep_a_single_order() {
        let h = Harness::new();
        let goods: Vec<_> = (0..4).map(|i| h.origin_good(&format!("LOT-61{i}")).id).collect();
        let committed = Mutex::new(Vec::new());

        std::thread::scope(|s| {
            for good_id in &goods {
                let (h, committed) = (&h, &committed);
                s.spawn(move || {
                    let good = h.advance_by(*good_id, &[MILL]);
                    committed.lock().push(good.id);
                });
            }
        });
        assert_eq!(committed.lock().len(), goods.len());

        let indices: Vec<u64> = h
            .node
            .event_bus()
            .events_since(0)
            .iter()
            .map(|e| e.global_index)
            .collect();
        let expected: Vec<u64> = (0..indices.len() as u64).collect();
        assert_eq!(indices, expected);
        for good_id in goods {
            assert!(h
                .node
                .provenance()
                .verify_chain(&AuditScope::Good(good_id))
                .intact);
        }
    }
}

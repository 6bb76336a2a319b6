//! # Provenance Entries
//!
//! One link of a per-scope hash chain.
//!
//! ```text
//! entry_hash = SHA-256(payload_hash ‖ previous_entry_hash ‖ sequence_le)
//! ```
//!
//! The first entry of every chain links to [`ZERO_HASH`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{
    sha256, AuditScope, Component, EntityRef, EntryReceipt, Hash, OperationRecord, Timestamp,
    ZERO_HASH,
};

/// A stored, immutable chain link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub scope: AuditScope,
    /// Position within `scope`'s chain, starting at 0.
    pub sequence: u64,
    /// Position across all chains, in commit order.
    pub global_index: u64,
    pub component: Component,
    pub operation: String,
    pub entity: EntityRef,
    /// Canonical bytes of the originating [`OperationRecord`].
    pub payload: Vec<u8>,
    pub payload_hash: Hash,
    pub previous_hash: Hash,
    pub entry_hash: Hash,
    pub timestamp: Timestamp,
}

impl ProvenanceEntry {
    /// Seal `record` as the entry following `previous` in `scope`'s chain.
    pub fn seal(
        scope: AuditScope,
        previous: Option<&ChainHead>,
        global_index: u64,
        record: &OperationRecord,
    ) -> Self {
        let (sequence, previous_hash) = match previous {
            Some(head) => (head.sequence + 1, head.entry_hash),
            None => (0, ZERO_HASH),
        };
        let payload = record.canonical_bytes();
        let payload_hash = sha256(&payload);
        let entry_hash = compute_entry_hash(&payload_hash, &previous_hash, sequence);

        Self {
            scope,
            sequence,
            global_index,
            component: record.component,
            operation: record.operation.clone(),
            entity: record.entity.clone(),
            payload,
            payload_hash,
            previous_hash,
            entry_hash,
            timestamp: record.timestamp,
        }
    }

    pub fn head(&self) -> ChainHead {
        ChainHead {
            sequence: self.sequence,
            entry_hash: self.entry_hash,
        }
    }

    pub fn receipt(&self) -> EntryReceipt {
        EntryReceipt {
            scope: self.scope,
            sequence: self.sequence,
            global_index: self.global_index,
            entry_hash: self.entry_hash,
        }
    }

    /// Decode the stored payload back into its record.
    pub fn record(&self) -> Option<OperationRecord> {
        serde_json::from_slice(&self.payload).ok()
    }
}

/// Tip of a chain: what the next append links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    pub sequence: u64,
    pub entry_hash: Hash,
}

/// `SHA-256(payload_hash ‖ previous_hash ‖ sequence)`, sequence little-endian.
pub fn compute_entry_hash(payload_hash: &Hash, previous_hash: &Hash, sequence: u64) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(payload_hash);
    hasher.update(previous_hash);
    hasher.update(sequence.to_le_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::GoodId;

    fn record(op: &str) -> OperationRecord {
        OperationRecord::new(Component::Custody, op, EntityRef::Good(GoodId(1)), 100)
    }

    #[test]
    fn test_genesis_links_to_zero() {
        let entry = ProvenanceEntry::seal(AuditScope::Good(GoodId(1)), None, 0, &record("register"));
        assert_eq!(entry.sequence, 0);
        assert_eq!(entry.previous_hash, ZERO_HASH);
        assert_eq!(entry.payload_hash, sha256(&entry.payload));
        assert_eq!(
            entry.entry_hash,
            compute_entry_hash(&entry.payload_hash, &ZERO_HASH, 0)
        );
    }

    #[test]
    fn test_successor_links_to_head() {
        let scope = AuditScope::Good(GoodId(1));
        let first = ProvenanceEntry::seal(scope, None, 0, &record("register"));
        let second = ProvenanceEntry::seal(scope, Some(&first.head()), 5, &record("advance"));
        assert_eq!(second.sequence, 1);
        assert_eq!(second.global_index, 5);
        assert_eq!(second.previous_hash, first.entry_hash);
        assert_ne!(second.entry_hash, first.entry_hash);
    }

    #[test]
    fn test_sequence_is_hashed() {
        let payload = sha256(b"x");
        assert_ne!(
            compute_entry_hash(&payload, &ZERO_HASH, 0),
            compute_entry_hash(&payload, &ZERO_HASH, 1)
        );
    }

    #[test]
    fn test_payload_decodes_to_record() {
        let original = record("advance").field("stage", "processing");
        let entry = ProvenanceEntry::seal(AuditScope::Good(GoodId(1)), None, 0, &original);
        assert_eq!(entry.record(), Some(original));
    }
}

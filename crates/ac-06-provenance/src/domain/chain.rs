//! # Chain Verification
//!
//! Pure replay of a chain from its stored payloads. Nothing here trusts the
//! stored hashes: every link is recomputed and compared.

use crate::domain::entry::{compute_entry_hash, ProvenanceEntry};
use serde::{Deserialize, Serialize};
use shared_types::{sha256, AuditScope, Hash, ZERO_HASH};

/// Which recomputed value disagreed with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MismatchReason {
    /// Entries are out of order or a sequence number is missing.
    Sequence,
    /// Stored payload no longer hashes to the stored payload hash.
    PayloadHash,
    /// Previous-hash link does not point at the prior entry.
    Link,
    /// Stored entry hash is not the hash of its own fields.
    EntryHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMismatch {
    /// Position of the first bad entry.
    pub sequence: u64,
    pub reason: MismatchReason,
}

/// Outcome of replaying one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub entry_count: usize,
    pub intact: bool,
    pub first_mismatch: Option<ChainMismatch>,
    /// Hash of the last entry, if any.
    pub head: Option<Hash>,
}

/// Replay `entries` in order and report the first inconsistency.
///
/// An empty chain is intact.
pub fn verify_chain(entries: &[ProvenanceEntry]) -> ChainReport {
    let mut expected_previous = ZERO_HASH;

    for (position, entry) in entries.iter().enumerate() {
        let expected_sequence = position as u64;
        let reason = if entry.sequence != expected_sequence {
            Some(MismatchReason::Sequence)
        } else if sha256(&entry.payload) != entry.payload_hash {
            Some(MismatchReason::PayloadHash)
        } else if entry.previous_hash != expected_previous {
            Some(MismatchReason::Link)
        } else if compute_entry_hash(&entry.payload_hash, &entry.previous_hash, entry.sequence)
            != entry.entry_hash
        {
            Some(MismatchReason::EntryHash)
        } else {
            None
        };

        if let Some(reason) = reason {
            return ChainReport {
                entry_count: entries.len(),
                intact: false,
                first_mismatch: Some(ChainMismatch {
                    sequence: expected_sequence,
                    reason,
                }),
                head: entries.last().map(|e| e.entry_hash),
            };
        }
        expected_previous = entry.entry_hash;
    }

    ChainReport {
        entry_count: entries.len(),
        intact: true,
        first_mismatch: None,
        head: entries.last().map(|e| e.entry_hash),
    }
}

/// Result of checking a presented history against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimVerdict {
    /// Every presented entry is internally consistent and matches the ledger.
    Authentic { scope: AuditScope, entries: usize },
    /// Nothing was presented.
    Empty,
    /// The presented entries belong to more than one chain.
    MixedScopes,
    /// The presented history does not replay on its own.
    Broken(ChainMismatch),
    /// The ledger holds a different entry at this position.
    Diverges { sequence: u64 },
    /// The ledger has no entry at this position.
    Unknown { sequence: u64 },
}

impl ClaimVerdict {
    pub fn is_authentic(&self) -> bool {
        matches!(self, ClaimVerdict::Authentic { .. })
    }
}

/// Check `claimed` without trusting it.
///
/// The claim must be a prefix of the stored chain starting at sequence 0,
/// must replay intact on its own, and each entry must equal the stored one.
pub fn verify_claim(claimed: &[ProvenanceEntry], stored: &[ProvenanceEntry]) -> ClaimVerdict {
    let Some(first) = claimed.first() else {
        return ClaimVerdict::Empty;
    };
    let scope = first.scope;
    if claimed.iter().any(|e| e.scope != scope) {
        return ClaimVerdict::MixedScopes;
    }

    let report = verify_chain(claimed);
    if let Some(mismatch) = report.first_mismatch {
        return ClaimVerdict::Broken(mismatch);
    }

    for entry in claimed {
        match stored.get(entry.sequence as usize) {
            None => {
                return ClaimVerdict::Unknown {
                    sequence: entry.sequence,
                }
            }
            Some(actual) if actual != entry => {
                return ClaimVerdict::Diverges {
                    sequence: entry.sequence,
                }
            }
            Some(_) => {}
        }
    }

    ClaimVerdict::Authentic {
        scope,
        entries: claimed.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Component, EntityRef, GoodId, OperationRecord};

    fn chain(len: usize) -> Vec<ProvenanceEntry> {
        let scope = AuditScope::Good(GoodId(1));
        let mut entries: Vec<ProvenanceEntry> = Vec::new();
        for i in 0..len {
            let record = OperationRecord::new(
                Component::Custody,
                format!("op-{i}"),
                EntityRef::Good(GoodId(1)),
                i as u64,
            );
            let head = entries.last().map(ProvenanceEntry::head);
            entries.push(ProvenanceEntry::seal(scope, head.as_ref(), i as u64, &record));
        }
        entries
    }

    #[test]
    fn test_empty_chain_intact() {
        let report = verify_chain(&[]);
        assert!(report.intact);
        assert_eq!(report.entry_count, 0);
        assert_eq!(report.head, None);
    }

    #[test]
    fn test_untampered_chain_intact() {
        let entries = chain(5);
        let report = verify_chain(&entries);
        assert!(report.intact);
        assert_eq!(report.head, Some(entries[4].entry_hash));
    }

    #[test]
    fn test_payload_flip_detected() {
        let mut entries = chain(4);
        entries[2].payload[0] ^= 0x01;
        let report = verify_chain(&entries);
        assert!(!report.intact);
        assert_eq!(
            report.first_mismatch,
            Some(ChainMismatch {
                sequence: 2,
                reason: MismatchReason::PayloadHash
            })
        );
    }

    #[test]
    fn test_rehashed_payload_breaks_link() {
        // Rewriting a payload and its hashes still breaks the successor's link.
        let mut entries = chain(3);
        entries[1].payload.push(b' ');
        entries[1].payload_hash = sha256(&entries[1].payload);
        entries[1].entry_hash = compute_entry_hash(
            &entries[1].payload_hash,
            &entries[1].previous_hash,
            entries[1].sequence,
        );
        let report = verify_chain(&entries);
        assert_eq!(
            report.first_mismatch,
            Some(ChainMismatch {
                sequence: 2,
                reason: MismatchReason::Link
            })
        );
    }

    #[test]
    fn test_stored_hash_overwrite_detected() {
        let mut entries = chain(2);
        entries[1].entry_hash = [9u8; 32];
        let report = verify_chain(&entries);
        assert_eq!(
            report.first_mismatch.map(|m| m.reason),
            Some(MismatchReason::EntryHash)
        );
    }

    #[test]
    fn test_dropped_entry_detected() {
        let mut entries = chain(3);
        entries.remove(1);
        let report = verify_chain(&entries);
        assert_eq!(
            report.first_mismatch.map(|m| m.reason),
            Some(MismatchReason::Sequence)
        );
    }

    #[test]
    fn test_claim_prefix_authentic() {
        let stored = chain(4);
        let verdict = verify_claim(&stored[..2], &stored);
        assert!(verdict.is_authentic());
    }

    #[test]
    fn test_claim_rejections() {
        let stored = chain(3);
        assert_eq!(verify_claim(&[], &stored), ClaimVerdict::Empty);

        let forged = chain(5);
        assert_eq!(
            verify_claim(&forged, &stored),
            ClaimVerdict::Unknown { sequence: 3 }
        );

        let mut tampered = stored.clone();
        tampered[0].payload[0] ^= 0x01;
        assert!(matches!(
            verify_claim(&tampered, &stored),
            ClaimVerdict::Broken(_)
        ));
    }

    #[test]
    fn test_consistent_rewrite_diverges() {
        let stored = chain(2);
        // A self-consistent alternate history.
        let scope = AuditScope::Good(GoodId(1));
        let record = OperationRecord::new(Component::Custody, "forged", EntityRef::Good(GoodId(1)), 0);
        let alternate = vec![ProvenanceEntry::seal(scope, None, 0, &record)];
        assert_eq!(
            verify_claim(&alternate, &stored),
            ClaimVerdict::Diverges { sequence: 0 }
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_any_payload_flip_breaks_chain(
                len in 1usize..12,
                pick in any::<prop::sample::Index>(),
                byte in any::<prop::sample::Index>(),
                mask in 1u8..=255,
            ) {
                let mut entries = chain(len);
                let target = pick.index(len);
                let payload = &mut entries[target].payload;
                let at = byte.index(payload.len());
                payload[at] ^= mask;

                let report = verify_chain(&entries);
                prop_assert!(!report.intact);
                prop_assert_eq!(report.first_mismatch.map(|m| m.sequence), Some(target as u64));
            }

            #[test]
            fn prop_untampered_chain_verifies(len in 0usize..20) {
                prop_assert!(verify_chain(&chain(len)).intact);
            }
        }
    }
}

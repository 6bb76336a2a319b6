//! Provenance Ledger Service
//!
//! The single write path of the audit trail. Every mutating operation in
//! every subsystem ends here.

use crate::domain::{
    verify_chain, verify_claim, ChainReport, ClaimVerdict, ProvenanceEntry, StoreError,
};
use crate::ports::inbound::ProvenanceApi;
use crate::ports::outbound::EntryStore;
use parking_lot::RwLock;
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{AuditScope, EntryReceipt, OperationRecord, ProvenanceFault, ProvenanceSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// Hash-chained, append-only ledger.
///
/// Once storage is exhausted the ledger halts for good: every later
/// `ensure_writable` or `append` returns [`ProvenanceFault::Halted`].
pub struct ProvenanceLedger<S: EntryStore> {
    store: RwLock<S>,
    publisher: Arc<dyn EventPublisher>,
    halted: AtomicBool,
}

impl<S: EntryStore> ProvenanceLedger<S> {
    pub fn new(store: S, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store: RwLock::new(store),
            publisher,
            halted: AtomicBool::new(false),
        }
    }

    fn halt(&self, capacity: usize) {
        if !self.halted.swap(true, Ordering::SeqCst) {
            error!(
                capacity,
                "Provenance storage exhausted, ledger halted awaiting operator intervention"
            );
        }
    }

    /// Entry at a global commit position.
    pub fn entry_at(&self, global_index: u64) -> Option<ProvenanceEntry> {
        self.store.read().entry_at(global_index)
    }

    /// Every scope with at least one entry.
    pub fn scopes(&self) -> Vec<AuditScope> {
        self.store.read().scopes()
    }

    /// Simulate tampering by flipping one stored payload byte.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn tamper_payload(&self, scope: &AuditScope, sequence: u64, byte: usize) -> bool {
        self.store.write().tamper_payload(scope, sequence, byte)
    }
}

impl<S: EntryStore> ProvenanceSink for ProvenanceLedger<S> {
    fn ensure_writable(&self) -> Result<(), ProvenanceFault> {
        if self.halted.load(Ordering::SeqCst) {
            return Err(ProvenanceFault::Halted);
        }
        let store = self.store.read();
        if store.len() >= store.capacity() {
            let capacity = store.capacity();
            drop(store);
            self.halt(capacity);
            return Err(ProvenanceFault::StorageExhausted { capacity });
        }
        Ok(())
    }

    fn append(
        &self,
        scope: AuditScope,
        record: OperationRecord,
    ) -> Result<EntryReceipt, ProvenanceFault> {
        if self.halted.load(Ordering::SeqCst) {
            return Err(ProvenanceFault::Halted);
        }

        let mut store = self.store.write();
        let head = store.head(&scope);
        let entry = ProvenanceEntry::seal(scope, head.as_ref(), store.len() as u64, &record);
        let receipt = entry.receipt();

        if let Err(StoreError::Full { capacity }) = store.append(entry) {
            drop(store);
            self.halt(capacity);
            return Err(ProvenanceFault::StorageExhausted { capacity });
        }

        debug!(
            scope = %scope,
            sequence = receipt.sequence,
            global_index = receipt.global_index,
            operation = %record.operation,
            "Provenance entry appended"
        );

        // Published under the store lock so subscribers see commit order.
        self.publisher.publish(LedgerEvent {
            global_index: receipt.global_index,
            scope,
            sequence: receipt.sequence,
            entry_hash: receipt.entry_hash,
            record,
        });

        Ok(receipt)
    }
}

impl<S: EntryStore> ProvenanceApi for ProvenanceLedger<S> {
    fn entries_for(&self, scope: &AuditScope) -> Vec<ProvenanceEntry> {
        self.store.read().entries(scope)
    }

    fn verify_chain(&self, scope: &AuditScope) -> ChainReport {
        let entries = self.entries_for(scope);
        let report = verify_chain(&entries);
        if !report.intact {
            tracing::warn!(
                scope = %scope,
                mismatch = ?report.first_mismatch,
                "Provenance chain failed verification"
            );
        }
        report
    }

    fn verify_claim(&self, claimed: &[ProvenanceEntry]) -> ClaimVerdict {
        let Some(first) = claimed.first() else {
            return ClaimVerdict::Empty;
        };
        let stored = self.entries_for(&first.scope);
        verify_claim(claimed, &stored)
    }

    fn entry_count(&self) -> usize {
        self.store.read().len()
    }

    fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }
}

//! # Outbound Ports (Driven Ports)
//!
//! Storage the provenance ledger requires the host to provide.

use crate::domain::{ChainHead, ProvenanceEntry, StoreError};
use shared_types::AuditScope;

/// Append-only entry storage.
///
/// There is no update or delete: once appended, an entry can only be read.
/// Testing: `InMemoryEntryStore` (adapters/memory.rs)
pub trait EntryStore: Send + Sync {
    /// Maximum number of entries this store accepts.
    fn capacity(&self) -> usize;

    /// Entries stored across all scopes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one entry. Fails only when the store is full.
    fn append(&mut self, entry: ProvenanceEntry) -> Result<(), StoreError>;

    /// Tip of `scope`'s chain, if it has entries.
    fn head(&self, scope: &AuditScope) -> Option<ChainHead>;

    /// All entries of `scope`, in sequence order.
    fn entries(&self, scope: &AuditScope) -> Vec<ProvenanceEntry>;

    /// Entry at a global commit position.
    fn entry_at(&self, global_index: u64) -> Option<ProvenanceEntry>;

    /// Every scope with at least one entry.
    fn scopes(&self) -> Vec<AuditScope>;

    /// Flip one payload byte in place. Returns false if no such entry.
    #[cfg(any(test, feature = "test-utils"))]
    fn tamper_payload(&mut self, scope: &AuditScope, sequence: u64, byte: usize) -> bool;
}

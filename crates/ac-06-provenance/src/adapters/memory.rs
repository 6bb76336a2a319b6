use crate::domain::{ChainHead, ProvenanceEntry, StoreError};
use crate::ports::outbound::EntryStore;
use shared_types::AuditScope;
use std::collections::BTreeMap;

/// In-memory entry store.
///
/// Entries live in one commit-ordered vector; each scope keeps the global
/// positions of its entries.
#[derive(Debug)]
pub struct InMemoryEntryStore {
    entries: Vec<ProvenanceEntry>,
    by_scope: BTreeMap<AuditScope, Vec<usize>>,
    capacity: usize,
}

impl InMemoryEntryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            by_scope: BTreeMap::new(),
            capacity,
        }
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl EntryStore for InMemoryEntryStore {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn append(&mut self, entry: ProvenanceEntry) -> Result<(), StoreError> {
        if self.entries.len() >= self.capacity {
            return Err(StoreError::Full {
                capacity: self.capacity,
            });
        }
        let position = self.entries.len();
        self.by_scope.entry(entry.scope).or_default().push(position);
        self.entries.push(entry);
        Ok(())
    }

    fn head(&self, scope: &AuditScope) -> Option<ChainHead> {
        self.by_scope
            .get(scope)
            .and_then(|positions| positions.last())
            .map(|&position| self.entries[position].head())
    }

    fn entries(&self, scope: &AuditScope) -> Vec<ProvenanceEntry> {
        self.by_scope
            .get(scope)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| self.entries[position].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn entry_at(&self, global_index: u64) -> Option<ProvenanceEntry> {
        usize::try_from(global_index)
            .ok()
            .and_then(|index| self.entries.get(index))
            .cloned()
    }

    fn scopes(&self) -> Vec<AuditScope> {
        self.by_scope.keys().copied().collect()
    }

    #[cfg(any(test, feature = "test-utils"))]
    fn tamper_payload(&mut self, scope: &AuditScope, sequence: u64, byte: usize) -> bool {
        let Some(&position) = self
            .by_scope
            .get(scope)
            .and_then(|positions| positions.get(sequence as usize))
        else {
            return false;
        };
        let payload = &mut self.entries[position].payload;
        if payload.is_empty() {
            return false;
        }
        let index = byte % payload.len();
        payload[index] ^= 0x01;
        true
    }
}

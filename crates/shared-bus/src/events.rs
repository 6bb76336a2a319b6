//! # Ledger Events
//!
//! The notification record emitted for every committed state change.

use serde::{Deserialize, Serialize};
use shared_types::{AuditScope, Component, EntityRef, Hash, OperationRecord, Timestamp};

/// One committed operation, as seen by external subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Position in the global commit order.
    pub global_index: u64,
    /// Chain the entry was appended to.
    pub scope: AuditScope,
    /// Position within that chain.
    pub sequence: u64,
    /// Hash of the provenance entry backing this event.
    pub entry_hash: Hash,
    /// Operation name, entity and changed fields.
    pub record: OperationRecord,
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self.record.component {
            Component::Identity => EventTopic::Identity,
            Component::Custody => EventTopic::Custody,
            Component::Marketplace => EventTopic::Marketplace,
            Component::Logistics => EventTopic::Logistics,
            Component::Provenance => EventTopic::Provenance,
            Component::ObjectReferences => EventTopic::ObjectReferences,
        }
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.record.operation
    }

    #[must_use]
    pub fn entity(&self) -> &EntityRef {
        &self.record.entity
    }

    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.record.timestamp
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Identity,
    Custody,
    Marketplace,
    Logistics,
    Provenance,
    ObjectReferences,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Chains to include. Empty means all chains.
    pub scopes: Vec<AuditScope>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            scopes: Vec::new(),
        }
    }

    /// Create a filter for events touching specific chains.
    #[must_use]
    pub fn scopes(scopes: Vec<AuditScope>) -> Self {
        Self {
            topics: Vec::new(),
            scopes,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let scope_match = self.scopes.is_empty() || self.scopes.contains(&event.scope);

        topic_match && scope_match
    }
}

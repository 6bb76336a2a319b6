//! # Audit Records
//!
//! The operation record every mutating call hands to the provenance ledger.
//! Its canonical JSON encoding is the payload that gets hashed into the
//! chain, and the same record becomes the outbound notification.

use crate::entities::{ActorId, GoodId, Hash, OfferId, ShipmentId, Timestamp, UploadRequestId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The chain an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuditScope {
    Good(GoodId),
    Actor(ActorId),
}

impl fmt::Display for AuditScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditScope::Good(id) => write!(f, "{id}"),
            AuditScope::Actor(id) => write!(f, "actor {id}"),
        }
    }
}

/// Subsystem that originated a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Component {
    Identity,
    Custody,
    Marketplace,
    Logistics,
    Provenance,
    ObjectReferences,
}

impl Component {
    pub fn as_str(self) -> &'static str {
        match self {
            Component::Identity => "identity",
            Component::Custody => "custody",
            Component::Marketplace => "marketplace",
            Component::Logistics => "logistics",
            Component::Provenance => "provenance",
            Component::ObjectReferences => "object_references",
        }
    }
}

/// The entity an operation changed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Actor(ActorId),
    Good(GoodId),
    Offer(OfferId),
    Transaction(u64),
    Shipment(ShipmentId),
    Token(String),
    Upload(UploadRequestId),
}

/// Which component, entity and operation produced a record, plus the key
/// fields it changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub component: Component,
    pub operation: String,
    pub entity: EntityRef,
    pub actor: Option<ActorId>,
    pub fields: BTreeMap<String, serde_json::Value>,
    pub timestamp: Timestamp,
}

impl OperationRecord {
    pub fn new(
        component: Component,
        operation: impl Into<String>,
        entity: EntityRef,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            component,
            operation: operation.into(),
            entity,
            actor: None,
            fields: BTreeMap::new(),
            timestamp,
        }
    }

    /// Record the acting caller.
    pub fn by(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Add one changed field.
    pub fn field(mut self, name: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Canonical payload bytes. Field order is fixed by `BTreeMap`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// What the ledger hands back after a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReceipt {
    pub scope: AuditScope,
    /// Position within the scope's chain, starting at 0.
    pub sequence: u64,
    /// Position across all chains, in commit order.
    pub global_index: u64,
    pub entry_hash: Hash,
}

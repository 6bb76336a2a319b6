//! # Test Doubles
//!
//! In-memory implementations of every cross-subsystem port, so each
//! subsystem can be unit tested without the others.

use crate::audit::{AuditScope, EntryReceipt, OperationRecord};
use crate::conditions::{ConditionKind, ConditionReading, ConditionSnapshot, ReadingSource, Staleness};
use crate::entities::{
    sha256, ActorId, ActorStanding, GoodId, GoodSummary, OfferId, OfferSettlement, Role, Stage,
    Timestamp,
};
use crate::errors::ProvenanceFault;
use crate::ports::{ActorDirectory, ConditionReader, GoodView, OfferSettlementView, ProvenanceSink};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Provenance sink that keeps every appended record.
#[derive(Default)]
pub struct RecordingSink {
    records: RwLock<Vec<(AuditScope, OperationRecord)>>,
    halted: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail with [`ProvenanceFault::Halted`].
    pub fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<(AuditScope, OperationRecord)> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Operation names appended to `scope`, in order.
    pub fn operations_for(&self, scope: &AuditScope) -> Vec<String> {
        self.records
            .read()
            .iter()
            .filter(|(s, _)| s == scope)
            .map(|(_, r)| r.operation.clone())
            .collect()
    }
}

impl ProvenanceSink for RecordingSink {
    fn ensure_writable(&self) -> Result<(), ProvenanceFault> {
        if self.halted.load(Ordering::SeqCst) {
            Err(ProvenanceFault::Halted)
        } else {
            Ok(())
        }
    }

    fn append(
        &self,
        scope: AuditScope,
        record: OperationRecord,
    ) -> Result<EntryReceipt, ProvenanceFault> {
        self.ensure_writable()?;
        let mut records = self.records.write();
        let sequence = records.iter().filter(|(s, _)| *s == scope).count() as u64;
        let global_index = records.len() as u64;
        let entry_hash = sha256(&record.canonical_bytes());
        records.push((scope, record));
        Ok(EntryReceipt {
            scope,
            sequence,
            global_index,
            entry_hash,
        })
    }
}

/// Actor directory backed by a mutable map.
#[derive(Default)]
pub struct StaticDirectory {
    actors: RwLock<HashMap<ActorId, ActorStanding>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active actor.
    pub fn with(self, actor: ActorId, role: Role) -> Self {
        self.insert(actor, role);
        self
    }

    pub fn insert(&self, actor: ActorId, role: Role) {
        self.actors.write().insert(
            actor,
            ActorStanding {
                actor,
                role,
                active: true,
                blacklisted: false,
            },
        );
    }

    pub fn set_active(&self, actor: &ActorId, active: bool) {
        if let Some(standing) = self.actors.write().get_mut(actor) {
            standing.active = active;
        }
    }

    pub fn set_blacklisted(&self, actor: &ActorId, blacklisted: bool) {
        if let Some(standing) = self.actors.write().get_mut(actor) {
            standing.blacklisted = blacklisted;
        }
    }
}

impl ActorDirectory for StaticDirectory {
    fn standing(&self, actor: &ActorId) -> Option<ActorStanding> {
        self.actors.read().get(actor).copied()
    }
}

/// Good view backed by a mutable map.
#[derive(Default)]
pub struct StaticGoods {
    goods: RwLock<HashMap<GoodId, GoodSummary>>,
}

impl StaticGoods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, summary: GoodSummary) {
        self.goods.write().insert(summary.id, summary);
    }

    /// Insert a good with the given stage and parties.
    pub fn put_simple(&self, id: u64, stage: Stage, producer: ActorId, holder: ActorId) {
        self.put(GoodSummary {
            id: GoodId(id),
            code: format!("GOOD-{id}"),
            name: format!("good {id}"),
            producer,
            holder,
            stage,
            created_at: 0,
            stage_count: 1,
        });
    }

    pub fn set_stage(&self, id: GoodId, stage: Stage) {
        if let Some(good) = self.goods.write().get_mut(&id) {
            good.stage = stage;
        }
    }

    pub fn set_holder(&self, id: GoodId, holder: ActorId) {
        if let Some(good) = self.goods.write().get_mut(&id) {
            good.holder = holder;
        }
    }
}

impl GoodView for StaticGoods {
    fn good_summary(&self, id: GoodId) -> Option<GoodSummary> {
        self.goods.read().get(&id).cloned()
    }
}

/// Condition reader returning fixed live readings.
pub struct StaticConditions {
    values: RwLock<HashMap<ConditionKind, f64>>,
    taken_at: Timestamp,
}

impl StaticConditions {
    pub fn new(taken_at: Timestamp) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            taken_at,
        }
    }

    pub fn with(self, kind: ConditionKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    pub fn set(&self, kind: ConditionKind, value: f64) {
        self.values.write().insert(kind, value);
    }
}

impl ConditionReader for StaticConditions {
    fn snapshot(&self) -> ConditionSnapshot {
        let values = self.values.read();
        ConditionSnapshot {
            taken_at: self.taken_at,
            readings: values
                .iter()
                .map(|(&kind, &value)| ConditionReading {
                    kind,
                    value,
                    as_of: self.taken_at,
                    source: ReadingSource::Live,
                    staleness: Staleness::Fresh,
                })
                .collect(),
        }
    }
}

/// Offer settlements backed by a mutable map.
#[derive(Default)]
pub struct StaticSettlements {
    settlements: RwLock<HashMap<OfferId, OfferSettlement>>,
}

impl StaticSettlements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, settlement: OfferSettlement) {
        self.settlements.write().insert(settlement.offer_id, settlement);
    }
}

impl OfferSettlementView for StaticSettlements {
    fn settlement(&self, id: OfferId) -> Option<OfferSettlement> {
        self.settlements.read().get(&id).copied()
    }
}

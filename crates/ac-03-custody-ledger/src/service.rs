//! Custody Ledger Service
//!
//! Owns every good and its stage records. A mutation holds the ledger write
//! lock from the first check through the provenance append, then applies the
//! new good value and bumps the stage counters.

use crate::domain::{
    evaluate_alerts, Attestation, BatchEntry, CustodyConfig, CustodyError, CustodyResult, Good,
    NewGood, StageRecord, SupplyChainStats,
};
use crate::ports::inbound::CustodyApi;
use crate::ports::outbound::GoodStore;
use parking_lot::RwLock;
use shared_types::capability::{is_admin, require_active, require_active_role, require_party};
use shared_types::{
    ActorDirectory, ActorId, AuditScope, Component, ConditionReader, CustodyTransfer, Denied,
    EntityRef, GoodId, GoodSummary, GoodView, OperationRecord, ProvenanceSink, Role, Stage,
    TimeSource,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const PRODUCER_ONLY: &[Role] = &[Role::Producer];
const STAGE_ROLES: &[Role] = &[Role::Processor, Role::Distributor, Role::Retailer];

struct LedgerState<S> {
    goods: S,
    stage_counts: BTreeMap<Stage, usize>,
    active: usize,
}

impl<S: GoodStore> LedgerState<S> {
    fn moved(&mut self, from: Stage, to: Stage) {
        if let Some(n) = self.stage_counts.get_mut(&from) {
            *n = n.saturating_sub(1);
        }
        *self.stage_counts.entry(to).or_default() += 1;
    }
}

/// Custody ledger.
pub struct CustodyLedger<S: GoodStore> {
    config: CustodyConfig,
    state: RwLock<LedgerState<S>>,
    directory: Arc<dyn ActorDirectory>,
    conditions: Arc<dyn ConditionReader>,
    provenance: Arc<dyn ProvenanceSink>,
    clock: Arc<dyn TimeSource>,
}

impl<S: GoodStore> CustodyLedger<S> {
    pub fn new(
        config: CustodyConfig,
        goods: S,
        directory: Arc<dyn ActorDirectory>,
        conditions: Arc<dyn ConditionReader>,
        provenance: Arc<dyn ProvenanceSink>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let mut stage_counts = BTreeMap::new();
        let mut active = 0;
        for good in goods.all() {
            *stage_counts.entry(good.stage).or_default() += 1;
            if good.stage != Stage::Deactivated {
                active += 1;
            }
        }
        Self {
            config,
            state: RwLock::new(LedgerState {
                goods,
                stage_counts,
                active,
            }),
            directory,
            conditions,
            provenance,
            clock,
        }
    }

    fn record(&self, operation: &str, good_id: GoodId) -> OperationRecord {
        OperationRecord::new(
            Component::Custody,
            operation,
            EntityRef::Good(good_id),
            self.clock.now(),
        )
    }

    fn check_text(field: &'static str, value: &str, max_len: usize) -> CustodyResult<()> {
        if value.trim().is_empty() {
            return Err(CustodyError::InvalidInput {
                field,
                reason: "must not be empty",
            });
        }
        if value.len() > max_len {
            return Err(CustodyError::InvalidInput {
                field,
                reason: "too long",
            });
        }
        Ok(())
    }

    fn check_estimate(estimate: Option<f64>) -> CustodyResult<()> {
        match estimate {
            Some(value) if !value.is_finite() || value < 0.0 => Err(CustodyError::InvalidInput {
                field: "price_estimate",
                reason: "must be a finite non-negative number",
            }),
            _ => Ok(()),
        }
    }

    fn load(goods: &S, good_id: GoodId) -> CustodyResult<Good> {
        goods.get(good_id).ok_or(CustodyError::GoodNotFound { good_id })
    }

    /// Snapshot conditions and evaluate alerts for a new stage record.
    fn stage_record(
        &self,
        good_id: GoodId,
        stage: Stage,
        actor: ActorId,
        attestation: Attestation,
        previous_estimate: Option<f64>,
    ) -> StageRecord {
        let conditions = self.conditions.snapshot();
        let alerts = evaluate_alerts(
            &conditions,
            attestation.price_estimate,
            previous_estimate,
            &self.config.alerts,
        );
        for alert in &alerts {
            warn!(good = %good_id, stage = %stage, alert = alert.code(), "{alert}");
        }
        StageRecord {
            stage,
            actor,
            attestation: attestation.text,
            price_estimate: attestation.price_estimate,
            location: attestation.location,
            recorded_at: self.clock.now(),
            conditions,
            alerts,
        }
    }

    /// Append, then apply. Both happen under the caller's write lock.
    fn commit(
        &self,
        state: &mut LedgerState<S>,
        caller: ActorId,
        good: Good,
        record: OperationRecord,
    ) -> CustodyResult<Good> {
        self.provenance
            .append(AuditScope::Good(good.id), record.by(caller))?;
        state.goods.put(good.clone());
        Ok(good)
    }

    fn viewable_by(&self, good: &Good, caller: &ActorId) -> bool {
        good.involves(caller) || is_admin(self.directory.as_ref(), caller)
    }

    fn entry_for(&self, good: Option<Good>, id: GoodId, caller: &ActorId) -> BatchEntry {
        match good {
            Some(good) if self.viewable_by(&good, caller) => BatchEntry::Visible(good),
            _ => BatchEntry::Placeholder { id },
        }
    }
}

impl<S: GoodStore> CustodyApi for CustodyLedger<S> {
    fn register(&self, caller: ActorId, request: NewGood) -> CustodyResult<Good> {
        self.provenance.ensure_writable()?;
        require_active_role(self.directory.as_ref(), &caller, PRODUCER_ONLY)?;

        let limits = &self.config.limits;
        Self::check_text("name", &request.name, limits.max_name_len)?;
        Self::check_text("code", &request.code, limits.max_code_len)?;
        Self::check_text("attestation", &request.attestation.text, limits.max_attestation_len)?;
        Self::check_estimate(request.attestation.price_estimate)?;

        let mut state = self.state.write();
        if let Some(existing) = state.goods.by_code(&request.code) {
            return Err(CustodyError::DuplicateCode {
                code: request.code,
                existing,
            });
        }

        let id = state.goods.next_id();
        let location = request.attestation.location.clone();
        let origin = self.stage_record(id, Stage::Origin, caller, request.attestation, None);
        let good = Good {
            id,
            code: request.code,
            name: request.name,
            producer: caller,
            holder: caller,
            stage: Stage::Origin,
            location,
            created_at: self.clock.now(),
            records: vec![origin],
        };

        let record = self
            .record("register", id)
            .field("code", &good.code)
            .field("name", &good.name)
            .field("stage", good.stage)
            .field("holder", good.holder)
            .field("alerts", good.records[0].alerts.len());
        let good = self.commit(&mut state, caller, good, record)?;
        *state.stage_counts.entry(Stage::Origin).or_default() += 1;
        state.active += 1;

        info!(good = %good.id, code = %good.code, producer = %caller, "Good registered");
        Ok(good)
    }

    fn advance(
        &self,
        caller: ActorId,
        good_id: GoodId,
        attestation: Attestation,
    ) -> CustodyResult<Good> {
        self.provenance.ensure_writable()?;
        let standing = require_active(self.directory.as_ref(), &caller)?;
        if attestation.text.trim().is_empty() {
            return Err(CustodyError::EmptyAttestation);
        }
        if attestation.text.len() > self.config.limits.max_attestation_len {
            return Err(CustodyError::InvalidInput {
                field: "attestation",
                reason: "too long",
            });
        }
        Self::check_estimate(attestation.price_estimate)?;

        let mut state = self.state.write();
        let current = Self::load(&state.goods, good_id)?;
        if current.stage == Stage::Deactivated {
            return Err(CustodyError::GoodDeactivated { good_id });
        }
        let target = standing.role.target_stage().ok_or(Denied::WrongRole {
            actor: caller,
            actual: standing.role,
            required: STAGE_ROLES,
        })?;
        if !current.stage.can_transition_to(target) {
            return Err(CustodyError::InvalidTransition {
                good_id,
                from: current.stage,
                to: target,
            });
        }

        let previous_estimate = current.last_price_estimate();
        let stage_record =
            self.stage_record(good_id, target, caller, attestation, previous_estimate);
        let alerts = stage_record.alerts.len();
        let from = current.stage;
        let mut updated = current;
        if let Some(location) = &stage_record.location {
            updated.location = Some(location.clone());
        }
        updated.stage = target;
        updated.holder = caller;
        updated.records.push(stage_record);

        let record = self
            .record("advance", good_id)
            .field("from", from)
            .field("stage", target)
            .field("holder", caller)
            .field("alerts", alerts);
        let updated = self.commit(&mut state, caller, updated, record)?;
        state.moved(from, target);

        info!(good = %good_id, from = %from, to = %target, by = %caller, alerts, "Good advanced");
        Ok(updated)
    }

    fn mark_consumed(&self, caller: ActorId, good_id: GoodId) -> CustodyResult<Good> {
        self.provenance.ensure_writable()?;

        let mut state = self.state.write();
        let current = Self::load(&state.goods, good_id)?;
        if current.stage != Stage::Retail {
            return Err(CustodyError::InvalidState {
                good_id,
                actual: current.stage,
                expected: "retail",
            });
        }

        let stage_record = self.stage_record(
            good_id,
            Stage::Consumed,
            caller,
            Attestation::new("consumed"),
            None,
        );
        let mut updated = current;
        updated.stage = Stage::Consumed;
        updated.records.push(stage_record);

        let record = self
            .record("mark_consumed", good_id)
            .field("stage", Stage::Consumed);
        let updated = self.commit(&mut state, caller, updated, record)?;
        state.moved(Stage::Retail, Stage::Consumed);

        info!(good = %good_id, by = %caller, "Good consumed");
        Ok(updated)
    }

    fn deactivate(&self, caller: ActorId, good_id: GoodId) -> CustodyResult<Good> {
        self.provenance.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;

        let mut state = self.state.write();
        let current = Self::load(&state.goods, good_id)?;
        require_party(&caller, &current.producer, "originating producer")?;
        if current.stage != Stage::Origin {
            return Err(CustodyError::InvalidState {
                good_id,
                actual: current.stage,
                expected: "origin",
            });
        }

        let stage_record = self.stage_record(
            good_id,
            Stage::Deactivated,
            caller,
            Attestation::new("deactivated by producer"),
            None,
        );
        let mut updated = current;
        updated.stage = Stage::Deactivated;
        updated.records.push(stage_record);

        let record = self
            .record("deactivate", good_id)
            .field("stage", Stage::Deactivated);
        let updated = self.commit(&mut state, caller, updated, record)?;
        state.moved(Stage::Origin, Stage::Deactivated);
        state.active = state.active.saturating_sub(1);

        info!(good = %good_id, by = %caller, "Good deactivated");
        Ok(updated)
    }

    fn apply_custody_transfer(
        &self,
        caller: ActorId,
        transfer: CustodyTransfer,
    ) -> CustodyResult<Good> {
        self.provenance.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;
        require_party(&caller, &transfer.receiver, "transfer receiver")?;

        let good_id = transfer.good_id;
        let mut state = self.state.write();
        let current = Self::load(&state.goods, good_id)?;
        if current.stage.is_terminal() {
            return Err(CustodyError::InvalidState {
                good_id,
                actual: current.stage,
                expected: "active and not consumed",
            });
        }
        if current.holder != transfer.sender {
            return Err(CustodyError::HolderMismatch {
                good_id,
                holder: current.holder,
                sender: transfer.sender,
            });
        }

        let updated = Good {
            holder: transfer.receiver,
            ..current
        };
        let record = self
            .record("custody_transfer", good_id)
            .field("shipment", transfer.shipment_id.0)
            .field("from", transfer.sender)
            .field("holder", transfer.receiver);
        let updated = self.commit(&mut state, caller, updated, record)?;

        info!(
            good = %good_id,
            shipment = %transfer.shipment_id,
            from = %transfer.sender,
            to = %transfer.receiver,
            "Custody transferred"
        );
        Ok(updated)
    }

    fn get_good(&self, id: GoodId) -> Option<Good> {
        self.state.read().goods.get(id)
    }

    fn get_by_code(&self, code: &str) -> Option<Good> {
        let state = self.state.read();
        state.goods.by_code(code).and_then(|id| state.goods.get(id))
    }

    fn get_journey(&self, id: GoodId) -> CustodyResult<Vec<StageRecord>> {
        let state = self.state.read();
        Self::load(&state.goods, id).map(|good| good.records)
    }

    fn get_by_stage(&self, stage: Stage) -> Vec<GoodSummary> {
        self.state
            .read()
            .goods
            .all()
            .iter()
            .filter(|g| g.stage == stage)
            .map(Good::summary)
            .collect()
    }

    fn goods_held_by(&self, actor: &ActorId) -> Vec<GoodSummary> {
        self.state
            .read()
            .goods
            .all()
            .iter()
            .filter(|g| g.holder == *actor && !g.stage.is_terminal())
            .map(Good::summary)
            .collect()
    }

    fn supply_chain_stats(&self) -> SupplyChainStats {
        let state = self.state.read();
        let per_stage = Stage::LIFECYCLE
            .into_iter()
            .chain([Stage::Deactivated])
            .map(|stage| (stage, state.stage_counts.get(&stage).copied().unwrap_or(0)))
            .collect();
        SupplyChainStats {
            total: state.goods.len(),
            active: state.active,
            per_stage,
        }
    }

    fn get_batch(&self, caller: &ActorId, ids: &[GoodId]) -> Vec<BatchEntry> {
        let state = self.state.read();
        let entries: Vec<BatchEntry> = ids
            .iter()
            .map(|&id| self.entry_for(state.goods.get(id), id, caller))
            .collect();
        debug!(
            caller = %caller,
            requested = ids.len(),
            hidden = entries.iter().filter(|e| e.is_placeholder()).count(),
            "Batch lookup"
        );
        entries
    }

    fn get_all_viewable(&self, caller: &ActorId) -> Vec<BatchEntry> {
        self.state
            .read()
            .goods
            .all()
            .into_iter()
            .map(|good| {
                let id = good.id;
                self.entry_for(Some(good), id, caller)
            })
            .collect()
    }
}

impl<S: GoodStore> GoodView for CustodyLedger<S> {
    fn good_summary(&self, id: GoodId) -> Option<GoodSummary> {
        self.state.read().goods.get(id).map(|g| g.summary())
    }
}

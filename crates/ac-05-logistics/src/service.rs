//! Logistics Tracker Service

use crate::domain::{
    authorize, Checkpoint, LogisticsConfig, LogisticsError, LogisticsResult, NewShipment,
    Shipment, ShipmentStatus, StatusUpdate,
};
use crate::ports::inbound::LogisticsApi;
use crate::ports::outbound::ShipmentStore;
use parking_lot::RwLock;
use shared_types::capability::{require_active, require_party};
use shared_types::{
    ActorDirectory, ActorId, AuditScope, Component, CustodyTransfer, EntityRef, GoodId, GoodView,
    OfferId, OfferSettlementView, OperationRecord, ProvenanceSink, Role, ShipmentId, TimeSource,
};
use std::sync::Arc;
use tracing::info;

/// Logistics tracker.
///
/// Tracks physical movement only. Custody changes when the caller applies
/// the [`CustodyTransfer`] returned by `confirm_delivery` to the custody
/// ledger.
pub struct LogisticsTracker<S: ShipmentStore> {
    config: LogisticsConfig,
    store: RwLock<S>,
    directory: Arc<dyn ActorDirectory>,
    goods: Arc<dyn GoodView>,
    settlements: Arc<dyn OfferSettlementView>,
    provenance: Arc<dyn ProvenanceSink>,
    clock: Arc<dyn TimeSource>,
}

impl<S: ShipmentStore> LogisticsTracker<S> {
    pub fn new(
        config: LogisticsConfig,
        store: S,
        directory: Arc<dyn ActorDirectory>,
        goods: Arc<dyn GoodView>,
        settlements: Arc<dyn OfferSettlementView>,
        provenance: Arc<dyn ProvenanceSink>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            store: RwLock::new(store),
            directory,
            goods,
            settlements,
            provenance,
            clock,
        }
    }

    fn record(&self, operation: &str, shipment_id: ShipmentId) -> OperationRecord {
        OperationRecord::new(
            Component::Logistics,
            operation,
            EntityRef::Shipment(shipment_id),
            self.clock.now(),
        )
    }

    fn check_text(field: &'static str, value: &str, max_len: usize) -> LogisticsResult<()> {
        if value.trim().is_empty() {
            return Err(LogisticsError::InvalidInput {
                field,
                reason: "must not be empty",
            });
        }
        if value.len() > max_len {
            return Err(LogisticsError::InvalidInput {
                field,
                reason: "too long",
            });
        }
        Ok(())
    }

    fn load(store: &S, shipment_id: ShipmentId) -> LogisticsResult<Shipment> {
        store
            .get(shipment_id)
            .ok_or(LogisticsError::ShipmentNotFound { shipment_id })
    }

    fn check_receiver(&self, sender: &ActorId, receiver: &ActorId) -> LogisticsResult<()> {
        if receiver.is_zero() || receiver == sender {
            return Err(LogisticsError::InvalidInput {
                field: "receiver",
                reason: "must be a party other than the sender",
            });
        }
        match self.directory.standing(receiver) {
            Some(standing) if standing.in_good_standing() => Ok(()),
            _ => Err(LogisticsError::InvalidInput {
                field: "receiver",
                reason: "must be an active registered actor",
            }),
        }
    }

    fn check_carrier(&self, carrier: Option<ActorId>) -> LogisticsResult<Option<ActorId>> {
        let Some(carrier) = carrier.and_then(ActorId::non_zero) else {
            return Ok(None);
        };
        match self.directory.standing(&carrier) {
            Some(standing) if standing.role == Role::Carrier && standing.in_good_standing() => {
                Ok(Some(carrier))
            }
            _ => Err(LogisticsError::InvalidInput {
                field: "carrier",
                reason: "must be an active carrier",
            }),
        }
    }

    fn check_offer(
        &self,
        offer_id: OfferId,
        good_id: GoodId,
        sender: &ActorId,
        receiver: &ActorId,
    ) -> LogisticsResult<()> {
        let settlement = self
            .settlements
            .settlement(offer_id)
            .ok_or(LogisticsError::OfferNotFound { offer_id })?;
        if !settlement.accepted {
            return Err(LogisticsError::OfferNotSettled { offer_id });
        }
        if settlement.good_id != good_id {
            return Err(LogisticsError::OfferMismatch {
                offer_id,
                reason: "offer is for a different good",
            });
        }
        if !settlement.involves_pair(sender, receiver) {
            return Err(LogisticsError::OfferMismatch {
                offer_id,
                reason: "sender and receiver are not the offer parties",
            });
        }
        Ok(())
    }

    /// One forward step, shared by `advance_status` and `confirm_delivery`.
    fn transition(
        &self,
        caller: ActorId,
        shipment_id: ShipmentId,
        next: ShipmentStatus,
        update: StatusUpdate,
    ) -> LogisticsResult<Shipment> {
        self.provenance.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;
        if update.note.len() > self.config.max_note_len {
            return Err(LogisticsError::InvalidInput {
                field: "note",
                reason: "too long",
            });
        }
        if let Some(location) = &update.location {
            Self::check_text("location", location, self.config.max_location_len)?;
        }

        let mut store = self.store.write();
        let current = Self::load(&store, shipment_id)?;
        if current.status.next() != Some(next) {
            return Err(LogisticsError::InvalidTransition {
                shipment_id,
                from: current.status,
                to: next,
            });
        }
        authorize(&current, next, &caller)?;
        if current.checkpoints.len() >= self.config.max_checkpoints {
            return Err(LogisticsError::CheckpointLimit {
                shipment_id,
                limit: self.config.max_checkpoints,
            });
        }

        let now = self.clock.now();
        let from = current.status;
        let mut updated = current;
        updated.stamp(next, now);
        updated.checkpoints.push(Checkpoint {
            status: next,
            actor: caller,
            note: update.note,
            location: update.location,
            recorded_at: now,
        });

        let record = self
            .record("advance_status", shipment_id)
            .field("from", from)
            .field("status", next);
        self.provenance
            .append(AuditScope::Good(updated.good_id), record.by(caller))?;
        store.put(updated.clone());

        info!(shipment = %shipment_id, from = %from, to = %next, by = %caller, "Shipment status advanced");
        Ok(updated)
    }
}

impl<S: ShipmentStore> LogisticsApi for LogisticsTracker<S> {
    fn create_shipment(&self, caller: ActorId, request: NewShipment) -> LogisticsResult<Shipment> {
        self.provenance.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;

        Self::check_text(
            "tracking_code",
            &request.tracking_code,
            self.config.max_tracking_code_len,
        )?;
        Self::check_text("origin", &request.origin, self.config.max_location_len)?;
        Self::check_text("destination", &request.destination, self.config.max_location_len)?;
        self.check_receiver(&caller, &request.receiver)?;
        let carrier = self.check_carrier(request.carrier)?;

        let mut store = self.store.write();
        let good = self
            .goods
            .good_summary(request.good_id)
            .ok_or(LogisticsError::GoodNotFound {
                good_id: request.good_id,
            })?;
        if !good.is_tradeable() {
            return Err(LogisticsError::GoodNotShippable {
                good_id: good.id,
                stage: good.stage,
            });
        }
        require_party(&caller, &good.holder, "current holder")?;

        if let Some(existing) = store.by_tracking_code(&request.tracking_code) {
            return Err(LogisticsError::DuplicateTrackingCode {
                code: request.tracking_code,
                existing,
            });
        }
        if let Some(open) = store.for_good(good.id).iter().find(|s| s.is_open()) {
            return Err(LogisticsError::OpenShipmentExists {
                good_id: good.id,
                shipment_id: open.id,
            });
        }
        if let Some(offer_id) = request.offer_id {
            self.check_offer(offer_id, good.id, &caller, &request.receiver)?;
        }

        let now = self.clock.now();
        let shipment = Shipment {
            id: store.next_id(),
            good_id: good.id,
            offer_id: request.offer_id,
            sender: caller,
            receiver: request.receiver,
            carrier,
            tracking_code: request.tracking_code,
            origin: request.origin.clone(),
            destination: request.destination,
            metadata_ref: request.metadata_ref,
            status: ShipmentStatus::Created,
            created_at: now,
            picked_up_at: None,
            in_transit_at: None,
            delivered_at: None,
            confirmed_at: None,
            checkpoints: vec![Checkpoint {
                status: ShipmentStatus::Created,
                actor: caller,
                note: String::new(),
                location: Some(request.origin),
                recorded_at: now,
            }],
        };

        let record = self
            .record("create_shipment", shipment.id)
            .field("tracking_code", &shipment.tracking_code)
            .field("receiver", shipment.receiver)
            .field("carrier", shipment.carrier)
            .field("offer", shipment.offer_id.map(|o| o.0));
        self.provenance
            .append(AuditScope::Good(shipment.good_id), record.by(caller))?;
        store.put(shipment.clone());

        info!(
            shipment = %shipment.id,
            good = %shipment.good_id,
            sender = %caller,
            receiver = %shipment.receiver,
            self_delivery = shipment.is_self_delivery(),
            "Shipment created"
        );
        Ok(shipment)
    }

    fn advance_status(
        &self,
        caller: ActorId,
        shipment_id: ShipmentId,
        next: ShipmentStatus,
        update: StatusUpdate,
    ) -> LogisticsResult<Shipment> {
        // Confirmation has to yield a custody transfer.
        if next == ShipmentStatus::Confirmed {
            return Err(LogisticsError::InvalidInput {
                field: "next",
                reason: "confirm through confirm_delivery",
            });
        }
        self.transition(caller, shipment_id, next, update)
    }

    fn confirm_delivery(
        &self,
        caller: ActorId,
        shipment_id: ShipmentId,
    ) -> LogisticsResult<CustodyTransfer> {
        let confirmed = self.transition(
            caller,
            shipment_id,
            ShipmentStatus::Confirmed,
            StatusUpdate::new("delivery confirmed"),
        )?;
        confirmed
            .custody_transfer()
            .ok_or(LogisticsError::InvalidTransition {
                shipment_id,
                from: confirmed.status,
                to: ShipmentStatus::Confirmed,
            })
    }

    fn shipments_for_actor(
        &self,
        actor: &ActorId,
        status: Option<ShipmentStatus>,
    ) -> Vec<Shipment> {
        self.store
            .read()
            .all()
            .into_iter()
            .filter(|s| s.involves(actor) && status.map_or(true, |wanted| s.status == wanted))
            .collect()
    }

    fn shipment_detail(&self, shipment_id: ShipmentId) -> LogisticsResult<Shipment> {
        Self::load(&self.store.read(), shipment_id)
    }

    fn shipments_for_good(&self, good_id: GoodId) -> Vec<Shipment> {
        self.store.read().for_good(good_id)
    }

    fn by_tracking_code(&self, code: &str) -> Option<Shipment> {
        let store = self.store.read();
        store.by_tracking_code(code).and_then(|id| store.get(id))
    }
}

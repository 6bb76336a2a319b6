//! # Ledger Node
//!
//! Holds all subsystem instances and manages their wiring.
//!
//! ## Thread Safety
//!
//! - Subsystems are shared through `Arc` and guard their own state with
//!   `RwLock`
//! - Every mutating call made through the node takes the commit mutex
//!   first, so the provenance log has one global order
//! - Reads go straight to the subsystem and see the latest commit

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, instrument};

use ac_01_identity_registry::{
    Actor, IdentityApi, IdentityRegistry, InMemoryActorStore, NewActor, ProfileUpdate,
};
use ac_02_condition_gateway::ConditionGateway;
use ac_03_custody_ledger::{
    Attestation, BatchEntry, CustodyApi, CustodyError, CustodyLedger, Good, InMemoryGoodStore,
    NewGood,
};
use ac_04_marketplace::{
    InMemoryMarketStore, MarketApi, MarketTransaction, MarketplaceEngine, NewOffer,
    NewTransaction, Offer,
};
use ac_05_logistics::{
    InMemoryShipmentStore, LogisticsApi, LogisticsTracker, NewShipment, Shipment,
    ShipmentStatus, StatusUpdate,
};
use ac_06_provenance::{
    InMemoryEntryStore, ProvenanceLedger, VerificationApi, VerificationService,
    VerificationToken,
};
use ac_07_object_references::{
    FileKind, InMemoryUploadStore, ObjectReferenceApi, ObjectReferences, UploadOutcome,
    UploadRequest,
};
use shared_bus::{EventFilter, InMemoryEventBus, Subscription};
use shared_types::{
    ActorId, GoodId, Hash, OfferId, Role, ShipmentId, Stage, SystemTimeSource, TimeSource,
    UploadRequestId,
};

use crate::container::config::NodeConfig;
use crate::errors::NodeResult;

pub type Identity = IdentityRegistry<InMemoryActorStore>;
pub type Custody = CustodyLedger<InMemoryGoodStore>;
pub type Marketplace = MarketplaceEngine<InMemoryMarketStore>;
pub type Logistics = LogisticsTracker<InMemoryShipmentStore>;
pub type Provenance = ProvenanceLedger<InMemoryEntryStore>;
pub type Verification = VerificationService<InMemoryEntryStore>;
pub type Objects = ObjectReferences<InMemoryUploadStore>;

/// A complete ledger node.
///
/// Mutations go through the methods on this type. The subsystem accessors
/// are for reads; mutating through them skips the commit order.
pub struct LedgerNode {
    config: NodeConfig,
    clock: Arc<dyn TimeSource>,
    event_bus: Arc<InMemoryEventBus>,
    provenance: Arc<Provenance>,
    verification: Arc<Verification>,
    identity: Arc<Identity>,
    conditions: Arc<ConditionGateway>,
    custody: Arc<Custody>,
    market: Arc<Marketplace>,
    logistics: Arc<Logistics>,
    objects: Arc<Objects>,
    commit: Mutex<()>,
}

impl LedgerNode {
    /// Build a node on the wall clock.
    pub fn new(config: NodeConfig) -> NodeResult<Self> {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Build a node on an injected clock.
    ///
    /// Fails only if the bootstrap administrator cannot be seeded.
    #[instrument(name = "node_init", skip_all)]
    pub fn with_clock(config: NodeConfig, clock: Arc<dyn TimeSource>) -> NodeResult<Self> {
        info!("Initializing Agri-Custody ledger node");

        let event_bus = Arc::new(InMemoryEventBus::with_capacity(
            config.events.capacity,
            config.events.retention,
        ));
        let provenance = Arc::new(ProvenanceLedger::new(
            InMemoryEntryStore::new(config.provenance.max_entries),
            event_bus.clone(),
        ));
        info!(capacity = config.provenance.max_entries, "  [06] Provenance ledger initialized");

        let identity = Arc::new(IdentityRegistry::new(
            config.identity.clone(),
            InMemoryActorStore::new(),
            provenance.clone(),
            clock.clone(),
        )?);
        info!(admin = %config.identity.bootstrap_admin, "  [01] Identity registry initialized");

        let conditions = Arc::new(ConditionGateway::from_config(
            config.conditions.clone(),
            clock.clone(),
        ));
        info!(
            static_feeds = config.conditions.static_values.len(),
            "  [02] Condition gateway initialized"
        );

        let custody = Arc::new(CustodyLedger::new(
            config.custody.clone(),
            InMemoryGoodStore::new(),
            identity.clone(),
            conditions.clone(),
            provenance.clone(),
            clock.clone(),
        ));
        info!("  [03] Custody ledger initialized");

        let market = Arc::new(MarketplaceEngine::new(
            config.market.clone(),
            InMemoryMarketStore::new(),
            identity.clone(),
            custody.clone(),
            provenance.clone(),
            clock.clone(),
        ));
        info!(
            max_expiry_secs = config.market.max_expiry_secs,
            "  [04] Marketplace initialized"
        );

        let logistics = Arc::new(LogisticsTracker::new(
            config.logistics.clone(),
            InMemoryShipmentStore::new(),
            identity.clone(),
            custody.clone(),
            market.clone(),
            provenance.clone(),
            clock.clone(),
        ));
        info!("  [05] Logistics tracker initialized");

        let verification = Arc::new(VerificationService::new(
            config.provenance.clone(),
            provenance.clone(),
            custody.clone(),
            identity.clone(),
            clock.clone(),
        ));
        let objects = Arc::new(ObjectReferences::new(
            config.objects.clone(),
            InMemoryUploadStore::new(),
            identity.clone(),
            custody.clone(),
            provenance.clone(),
            clock.clone(),
        ));
        info!(
            operators = config.objects.operators.len(),
            "  [07] Verification tokens and object references initialized"
        );

        info!("All subsystems initialized");
        Ok(Self {
            config,
            clock,
            event_bus,
            provenance,
            verification,
            identity,
            conditions,
            custody,
            market,
            logistics,
            objects,
            commit: Mutex::new(()),
        })
    }

    // =========================================================================
    // IDENTITY
    // =========================================================================

    pub fn register_actor(&self, caller: ActorId, request: NewActor) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.register(caller, request)?)
    }

    pub fn update_profile(
        &self,
        caller: ActorId,
        actor: ActorId,
        update: ProfileUpdate,
    ) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.update_profile(caller, actor, update)?)
    }

    pub fn deactivate_actor(&self, caller: ActorId, actor: ActorId) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.deactivate(caller, actor)?)
    }

    pub fn reactivate_actor(&self, caller: ActorId, actor: ActorId) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.reactivate(caller, actor)?)
    }

    pub fn blacklist_actor(&self, caller: ActorId, actor: ActorId) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.blacklist(caller, actor)?)
    }

    pub fn unblacklist_actor(&self, caller: ActorId, actor: ActorId) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.unblacklist(caller, actor)?)
    }

    pub fn reassign_role(&self, caller: ActorId, actor: ActorId, role: Role) -> NodeResult<Actor> {
        let _commit = self.commit.lock();
        Ok(self.identity.reassign_role(caller, actor, role)?)
    }

    // =========================================================================
    // CUSTODY
    // =========================================================================

    pub fn register_good(&self, caller: ActorId, request: NewGood) -> NodeResult<Good> {
        let _commit = self.commit.lock();
        Ok(self.custody.register(caller, request)?)
    }

    pub fn advance_good(
        &self,
        caller: ActorId,
        good_id: GoodId,
        attestation: Attestation,
    ) -> NodeResult<Good> {
        let _commit = self.commit.lock();
        Ok(self.custody.advance(caller, good_id, attestation)?)
    }

    pub fn mark_consumed(&self, caller: ActorId, good_id: GoodId) -> NodeResult<Good> {
        let _commit = self.commit.lock();
        Ok(self.custody.mark_consumed(caller, good_id)?)
    }

    pub fn deactivate_good(&self, caller: ActorId, good_id: GoodId) -> NodeResult<Good> {
        let _commit = self.commit.lock();
        Ok(self.custody.deactivate(caller, good_id)?)
    }

    /// Positional lookup with placeholders for goods `caller` may not see.
    pub fn get_batch(&self, caller: &ActorId, ids: &[GoodId]) -> Vec<BatchEntry> {
        let _commit = self.commit.lock();
        self.custody.get_batch(caller, ids)
    }

    /// Every good in id order, with placeholders for those `caller` may not see.
    pub fn get_all_viewable(&self, caller: &ActorId) -> Vec<BatchEntry> {
        let _commit = self.commit.lock();
        self.custody.get_all_viewable(caller)
    }

    // =========================================================================
    // MARKETPLACE
    // =========================================================================

    pub fn create_offer(&self, caller: ActorId, request: NewOffer) -> NodeResult<Offer> {
        let _commit = self.commit.lock();
        Ok(self.market.create_offer(caller, request)?)
    }

    pub fn accept_offer(&self, caller: ActorId, offer_id: OfferId) -> NodeResult<Offer> {
        let _commit = self.commit.lock();
        Ok(self.market.accept_offer(caller, offer_id)?)
    }

    pub fn cancel_offer(&self, caller: ActorId, offer_id: OfferId) -> NodeResult<Offer> {
        let _commit = self.commit.lock();
        Ok(self.market.cancel_offer(caller, offer_id)?)
    }

    pub fn expire_offer(&self, caller: ActorId, offer_id: OfferId) -> NodeResult<Offer> {
        let _commit = self.commit.lock();
        Ok(self.market.expire_offer(caller, offer_id)?)
    }

    pub fn record_transaction(
        &self,
        caller: ActorId,
        request: NewTransaction,
    ) -> NodeResult<MarketTransaction> {
        let _commit = self.commit.lock();
        Ok(self.market.record_transaction(caller, request)?)
    }

    // =========================================================================
    // LOGISTICS
    // =========================================================================

    pub fn create_shipment(&self, caller: ActorId, request: NewShipment) -> NodeResult<Shipment> {
        let _commit = self.commit.lock();
        Ok(self.logistics.create_shipment(caller, request)?)
    }

    pub fn advance_shipment(
        &self,
        caller: ActorId,
        shipment_id: ShipmentId,
        next: ShipmentStatus,
        update: StatusUpdate,
    ) -> NodeResult<Shipment> {
        let _commit = self.commit.lock();
        Ok(self
            .logistics
            .advance_status(caller, shipment_id, next, update)?)
    }

    /// Confirm receipt and move custody to the receiver in one commit.
    ///
    /// The custody side is checked before logistics commits, so once the
    /// shipment is confirmed the transfer cannot be refused. A good already
    /// held by the receiver is left untouched.
    pub fn confirm_delivery(&self, caller: ActorId, shipment_id: ShipmentId) -> NodeResult<Good> {
        let _commit = self.commit.lock();

        let shipment = self.logistics.shipment_detail(shipment_id)?;
        let good_id = shipment.good_id;
        let good = self
            .custody
            .get_good(good_id)
            .ok_or(CustodyError::GoodNotFound { good_id })?;
        if good.stage.is_terminal() {
            return Err(CustodyError::InvalidState {
                good_id,
                actual: good.stage,
                expected: "active and not consumed",
            }
            .into());
        }
        if good.holder != shipment.sender && good.holder != shipment.receiver {
            return Err(CustodyError::HolderMismatch {
                good_id,
                holder: good.holder,
                sender: shipment.sender,
            }
            .into());
        }

        let transfer = self.logistics.confirm_delivery(caller, shipment_id)?;
        if good.holder == transfer.receiver {
            return Ok(good);
        }
        Ok(self.custody.apply_custody_transfer(caller, transfer)?)
    }

    // =========================================================================
    // PROVENANCE
    // =========================================================================

    pub fn issue_token(&self, caller: ActorId, good_id: GoodId) -> NodeResult<VerificationToken> {
        let _commit = self.commit.lock();
        Ok(self.verification.issue_token(caller, good_id)?)
    }

    pub fn deactivate_token(&self, caller: ActorId, code: &str) -> NodeResult<VerificationToken> {
        let _commit = self.commit.lock();
        Ok(self.verification.deactivate_token(caller, code)?)
    }

    // =========================================================================
    // OBJECT REFERENCES
    // =========================================================================

    pub fn request_upload(
        &self,
        caller: ActorId,
        good_id: GoodId,
        content_hash: Hash,
        file_kind: FileKind,
        stage: Stage,
    ) -> NodeResult<UploadRequestId> {
        let _commit = self.commit.lock();
        Ok(self
            .objects
            .request_upload(caller, good_id, content_hash, file_kind, stage)?)
    }

    pub fn report_upload_result(
        &self,
        caller: ActorId,
        request_id: UploadRequestId,
        outcome: UploadOutcome,
    ) -> NodeResult<UploadRequest> {
        let _commit = self.commit.lock();
        Ok(self
            .objects
            .report_upload_result(caller, request_id, outcome)?)
    }

    // =========================================================================
    // ACCESSOR METHODS
    // =========================================================================

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn clock(&self) -> Arc<dyn TimeSource> {
        Arc::clone(&self.clock)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn conditions(&self) -> &ConditionGateway {
        &self.conditions
    }

    pub fn custody(&self) -> &Custody {
        &self.custody
    }

    pub fn market(&self) -> &Marketplace {
        &self.market
    }

    pub fn logistics(&self) -> &Logistics {
        &self.logistics
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn verification(&self) -> &Verification {
        &self.verification
    }

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    /// Get the event bus for publishing/subscribing.
    pub fn event_bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.event_bus.subscribe(filter)
    }
}

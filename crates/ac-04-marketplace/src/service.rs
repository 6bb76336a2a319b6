//! Marketplace Service
//!
//! Offers are checked against the good's current stage and custody under the
//! market write lock. Expiry is lazy: an offer past its expiry stays `Open`
//! until someone calls `expire_offer`, but can no longer be accepted.

use crate::domain::{
    can_take, creator_side, is_sellable, MarketConfig, MarketError, MarketResult, MarketStats,
    MarketTransaction, NewOffer, NewTransaction, Offer, OfferKind, OfferStatus,
};
use crate::ports::inbound::MarketApi;
use crate::ports::outbound::MarketStore;
use parking_lot::RwLock;
use shared_types::capability::{is_admin, require_active, require_party};
use shared_types::{
    ActorDirectory, ActorId, AuditScope, Component, Denied, EntityRef, GoodId, GoodSummary,
    GoodView, OfferId, OfferSettlement, OfferSettlementView, OperationRecord, ProvenanceSink,
    TimeSource,
};
use std::sync::Arc;
use tracing::info;

/// Marketplace engine.
pub struct MarketplaceEngine<S: MarketStore> {
    config: MarketConfig,
    store: RwLock<S>,
    directory: Arc<dyn ActorDirectory>,
    goods: Arc<dyn GoodView>,
    provenance: Arc<dyn ProvenanceSink>,
    clock: Arc<dyn TimeSource>,
}

impl<S: MarketStore> MarketplaceEngine<S> {
    pub fn new(
        config: MarketConfig,
        store: S,
        directory: Arc<dyn ActorDirectory>,
        goods: Arc<dyn GoodView>,
        provenance: Arc<dyn ProvenanceSink>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            store: RwLock::new(store),
            directory,
            goods,
            provenance,
            clock,
        }
    }

    fn record(&self, operation: &str, entity: EntityRef) -> OperationRecord {
        OperationRecord::new(Component::Marketplace, operation, entity, self.clock.now())
    }

    fn load_offer(store: &S, offer_id: OfferId) -> MarketResult<Offer> {
        store
            .get_offer(offer_id)
            .ok_or(MarketError::OfferNotFound { offer_id })
    }

    fn load_good(&self, good_id: GoodId) -> MarketResult<GoodSummary> {
        self.goods
            .good_summary(good_id)
            .ok_or(MarketError::GoodNotFound { good_id })
    }

    fn positive(field: &'static str, value: u64) -> MarketResult<()> {
        if value == 0 {
            return Err(MarketError::InvalidInput {
                field,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    fn require_open(offer: &Offer) -> MarketResult<()> {
        if offer.status != OfferStatus::Open {
            return Err(MarketError::NotOpen {
                offer_id: offer.id,
                status: offer.status,
            });
        }
        Ok(())
    }

    fn require_unexpired(offer: &Offer, now: u64) -> MarketResult<()> {
        if offer.is_past_expiry(now) {
            return Err(MarketError::Expired {
                offer_id: offer.id,
                expires_at: offer.expires_at,
            });
        }
        Ok(())
    }

    fn validate_counterparty(
        &self,
        caller: &ActorId,
        counterparty: Option<ActorId>,
    ) -> MarketResult<Option<ActorId>> {
        let Some(counterparty) = counterparty.and_then(ActorId::non_zero) else {
            return Ok(None);
        };
        if counterparty == *caller {
            return Err(MarketError::InvalidInput {
                field: "counterparty",
                reason: "must differ from the creator",
            });
        }
        if self.directory.standing(&counterparty).is_none() {
            return Err(MarketError::InvalidInput {
                field: "counterparty",
                reason: "not registered",
            });
        }
        Ok(Some(counterparty))
    }

    /// Append, then apply. Both happen under the caller's write lock.
    fn commit(
        &self,
        store: &mut S,
        caller: ActorId,
        offer: Offer,
        record: OperationRecord,
    ) -> MarketResult<Offer> {
        self.provenance
            .append(AuditScope::Good(offer.good_id), record.by(caller))?;
        store.put_offer(offer.clone());
        Ok(offer)
    }

    fn close(
        &self,
        store: &mut S,
        caller: ActorId,
        offer: Offer,
        status: OfferStatus,
        operation: &str,
    ) -> MarketResult<Offer> {
        let now = self.clock.now();
        let closed = Offer {
            status,
            closed_at: Some(now),
            ..offer
        };
        let record = self
            .record(operation, EntityRef::Offer(closed.id))
            .field("status", closed.status);
        self.commit(store, caller, closed, record)
    }
}

impl<S: MarketStore> MarketApi for MarketplaceEngine<S> {
    fn create_offer(&self, caller: ActorId, request: NewOffer) -> MarketResult<Offer> {
        self.provenance.ensure_writable()?;
        let standing = require_active(self.directory.as_ref(), &caller)?;

        Self::positive("price", request.price)?;
        Self::positive("quantity", request.quantity)?;
        Self::positive("expiry_secs", request.expiry_secs)?;
        if request.expiry_secs > self.config.max_expiry_secs {
            return Err(MarketError::InvalidInput {
                field: "expiry_secs",
                reason: "exceeds the configured maximum",
            });
        }
        if request.terms.len() > self.config.max_terms_len {
            return Err(MarketError::InvalidInput {
                field: "terms",
                reason: "too long",
            });
        }
        let counterparty = self.validate_counterparty(&caller, request.counterparty)?;

        let mut store = self.store.write();
        let good = self.load_good(request.good_id)?;
        if !is_sellable(good.stage) {
            return Err(MarketError::NotTradeable {
                good_id: good.id,
                stage: good.stage,
            });
        }
        let side = creator_side(request.kind, &good, &standing).ok_or(MarketError::Ineligible {
            actor: caller,
            kind: request.kind,
            stage: good.stage,
        })?;

        let now = self.clock.now();
        let cap = self.config.max_open_offers_per_actor;
        let open = store
            .offers()
            .iter()
            .filter(|o| o.creator == caller && o.is_live(now))
            .count();
        if open >= cap {
            return Err(MarketError::OfferCapReached { actor: caller, cap });
        }

        let offer = Offer {
            id: store.next_offer_id(),
            creator: caller,
            creator_side: side,
            counterparty,
            good_id: good.id,
            kind: request.kind,
            price: request.price,
            quantity: request.quantity,
            terms: request.terms,
            created_at: now,
            expires_at: now.saturating_add(request.expiry_secs),
            stage_at_creation: good.stage,
            status: OfferStatus::Open,
            acceptor: None,
            closed_at: None,
        };
        let record = self
            .record("create_offer", EntityRef::Offer(offer.id))
            .field("kind", offer.kind)
            .field("price", offer.price)
            .field("quantity", offer.quantity)
            .field("stage", offer.stage_at_creation)
            .field("expires_at", offer.expires_at)
            .field("counterparty", offer.counterparty);
        let offer = self.commit(&mut *store, caller, offer, record)?;

        info!(
            offer = %offer.id,
            good = %offer.good_id,
            kind = %offer.kind,
            creator = %caller,
            price = offer.price,
            "Offer created"
        );
        Ok(offer)
    }

    fn accept_offer(&self, caller: ActorId, offer_id: OfferId) -> MarketResult<Offer> {
        self.provenance.ensure_writable()?;

        let mut store = self.store.write();
        let offer = Self::load_offer(&store, offer_id)?;
        let now = self.clock.now();
        Self::require_open(&offer)?;
        Self::require_unexpired(&offer, now)?;

        let standing = require_active(self.directory.as_ref(), &caller)?;
        if let Some(counterparty) = offer.counterparty {
            require_party(&caller, &counterparty, "offer counterparty")?;
        }
        if caller == offer.creator {
            return Err(MarketError::OwnOffer {
                offer_id,
                actor: caller,
            });
        }

        let good = self.load_good(offer.good_id)?;
        if good.stage != offer.stage_at_creation {
            return Err(MarketError::StageChanged {
                offer_id,
                recorded: offer.stage_at_creation,
                current: good.stage,
            });
        }
        if !can_take(offer.creator_side.opposite(), &good, &standing) {
            return Err(MarketError::Ineligible {
                actor: caller,
                kind: offer.kind,
                stage: good.stage,
            });
        }
        // The creator's side must still hold, e.g. a seller that lost custody.
        let creator_current = self
            .directory
            .standing(&offer.creator)
            .filter(|s| can_take(offer.creator_side, &good, s));
        if creator_current.is_none() {
            return Err(MarketError::Ineligible {
                actor: offer.creator,
                kind: offer.kind,
                stage: good.stage,
            });
        }

        let accepted = Offer {
            status: OfferStatus::Accepted,
            acceptor: Some(caller),
            closed_at: Some(now),
            ..offer
        };
        let record = self
            .record("accept_offer", EntityRef::Offer(offer_id))
            .field("status", accepted.status)
            .field("acceptor", caller);
        let accepted = self.commit(&mut *store, caller, accepted, record)?;

        info!(offer = %offer_id, acceptor = %caller, good = %accepted.good_id, "Offer accepted");
        Ok(accepted)
    }

    fn cancel_offer(&self, caller: ActorId, offer_id: OfferId) -> MarketResult<Offer> {
        self.provenance.ensure_writable()?;

        let mut store = self.store.write();
        let offer = Self::load_offer(&store, offer_id)?;
        require_party(&caller, &offer.creator, "offer creator")?;
        Self::require_open(&offer)?;

        let cancelled =
            self.close(&mut *store, caller, offer, OfferStatus::Cancelled, "cancel_offer")?;
        info!(offer = %offer_id, by = %caller, "Offer cancelled");
        Ok(cancelled)
    }

    fn expire_offer(&self, caller: ActorId, offer_id: OfferId) -> MarketResult<Offer> {
        self.provenance.ensure_writable()?;

        let mut store = self.store.write();
        let offer = Self::load_offer(&store, offer_id)?;
        Self::require_open(&offer)?;
        if !offer.is_past_expiry(self.clock.now()) {
            return Err(MarketError::NotYetExpired {
                offer_id,
                expires_at: offer.expires_at,
            });
        }

        let expired =
            self.close(&mut *store, caller, offer, OfferStatus::Expired, "expire_offer")?;
        info!(offer = %offer_id, by = %caller, "Offer expired");
        Ok(expired)
    }

    fn record_transaction(
        &self,
        caller: ActorId,
        request: NewTransaction,
    ) -> MarketResult<MarketTransaction> {
        self.provenance.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;
        let is_party = caller == request.seller || caller == request.buyer;
        if !is_party && !is_admin(self.directory.as_ref(), &caller) {
            return Err(Denied::NotParty {
                actor: caller,
                party: "seller or buyer",
            }
            .into());
        }

        Self::positive("price", request.price)?;
        Self::positive("quantity", request.quantity)?;
        if request.seller.is_zero() || request.buyer.is_zero() {
            return Err(MarketError::InvalidInput {
                field: "party",
                reason: "zero address",
            });
        }
        if request.seller == request.buyer {
            return Err(MarketError::InvalidInput {
                field: "buyer",
                reason: "must differ from the seller",
            });
        }
        if request.tag.len() > self.config.max_tag_len {
            return Err(MarketError::InvalidInput {
                field: "tag",
                reason: "too long",
            });
        }

        let mut store = self.store.write();
        self.load_good(request.good_id)?;

        let transaction = MarketTransaction {
            id: store.next_transaction_id(),
            good_id: request.good_id,
            seller: request.seller,
            buyer: request.buyer,
            price: request.price,
            quantity: request.quantity,
            tag: request.tag,
            recorded_by: caller,
            recorded_at: self.clock.now(),
        };
        let record = self
            .record("record_transaction", EntityRef::Transaction(transaction.id))
            .field("seller", transaction.seller)
            .field("buyer", transaction.buyer)
            .field("price", transaction.price)
            .field("quantity", transaction.quantity)
            .field("tag", &transaction.tag);
        self.provenance
            .append(AuditScope::Good(transaction.good_id), record.by(caller))?;
        store.push_transaction(transaction.clone());

        info!(
            transaction = transaction.id,
            good = %transaction.good_id,
            seller = %transaction.seller,
            buyer = %transaction.buyer,
            "Market transaction recorded"
        );
        Ok(transaction)
    }

    fn get_offer(&self, offer_id: OfferId) -> Option<Offer> {
        self.store.read().get_offer(offer_id)
    }

    fn offers_by_type(&self, kind: OfferKind) -> Vec<Offer> {
        self.store
            .read()
            .offers()
            .into_iter()
            .filter(|o| o.kind == kind)
            .collect()
    }

    fn open_offers_for(&self, actor: &ActorId) -> Vec<Offer> {
        let now = self.clock.now();
        self.store
            .read()
            .offers()
            .into_iter()
            .filter(|o| o.is_live(now) && (o.creator == *actor || o.counterparty == Some(*actor)))
            .collect()
    }

    fn offers_created_by(&self, actor: &ActorId) -> Vec<Offer> {
        self.store
            .read()
            .offers()
            .into_iter()
            .filter(|o| o.creator == *actor)
            .collect()
    }

    fn transactions_for_good(&self, good_id: GoodId) -> Vec<MarketTransaction> {
        self.store.read().transactions_for_good(good_id)
    }

    fn market_stats(&self) -> MarketStats {
        let now = self.clock.now();
        let store = self.store.read();
        let mut stats = MarketStats {
            transactions: store.transaction_count(),
            volume: store.transaction_volume(),
            ..MarketStats::default()
        };
        for offer in store.offers() {
            match offer.status {
                OfferStatus::Open if offer.is_past_expiry(now) => stats.expired += 1,
                OfferStatus::Open => stats.open += 1,
                OfferStatus::Accepted => stats.accepted += 1,
                OfferStatus::Expired => stats.expired += 1,
                OfferStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }
}

impl<S: MarketStore> OfferSettlementView for MarketplaceEngine<S> {
    fn settlement(&self, id: OfferId) -> Option<OfferSettlement> {
        self.store.read().get_offer(id).map(|o| o.settlement())
    }
}

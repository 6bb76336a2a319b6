//! Object Reference Service

use crate::domain::{
    FileKind, IntegrityReport, ObjectConfig, ObjectError, ObjectResult, UploadOutcome,
    UploadRequest, UploadStatus,
};
use crate::ports::inbound::ObjectReferenceApi;
use crate::ports::outbound::UploadStore;
use parking_lot::RwLock;
use shared_types::capability::{is_admin, require_active};
use shared_types::{
    ActorDirectory, ActorId, AuditScope, Component, Denied, EntityRef, GoodId, GoodView, Hash,
    OperationRecord, ProvenanceSink, Stage, TimeSource, UploadRequestId, ZERO_HASH,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry of off-chain objects attached to goods.
///
/// Only the content hash and the final reference live here; the bytes
/// never pass through this crate.
pub struct ObjectReferences<S: UploadStore> {
    config: ObjectConfig,
    store: RwLock<S>,
    directory: Arc<dyn ActorDirectory>,
    goods: Arc<dyn GoodView>,
    provenance: Arc<dyn ProvenanceSink>,
    clock: Arc<dyn TimeSource>,
}

impl<S: UploadStore> ObjectReferences<S> {
    pub fn new(
        config: ObjectConfig,
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

    fn record(&self, operation: &str, request_id: UploadRequestId) -> OperationRecord {
        OperationRecord::new(
            Component::ObjectReferences,
            operation,
            EntityRef::Upload(request_id),
            self.clock.now(),
        )
    }

    fn check_reporter(&self, caller: &ActorId) -> Result<(), Denied> {
        if self.config.is_operator(caller) || is_admin(self.directory.as_ref(), caller) {
            Ok(())
        } else {
            Err(Denied::NotParty {
                actor: *caller,
                party: "administrator or upload operator",
            })
        }
    }

    fn check_outcome(&self, outcome: &UploadOutcome) -> ObjectResult<()> {
        let (field, text, max_len) = match outcome {
            UploadOutcome::Completed { reference } => {
                ("reference", reference, self.config.max_reference_len)
            }
            UploadOutcome::Failed { error } => ("error", error, self.config.max_error_len),
        };
        if text.trim().is_empty() {
            return Err(ObjectError::InvalidInput {
                field,
                reason: "must not be empty",
            });
        }
        if text.len() > max_len {
            return Err(ObjectError::InvalidInput {
                field,
                reason: "too long",
            });
        }
        Ok(())
    }
}

impl<S: UploadStore> ObjectReferenceApi for ObjectReferences<S> {
    fn request_upload(
        &self,
        caller: ActorId,
        good_id: GoodId,
        content_hash: Hash,
        file_kind: FileKind,
        stage: Stage,
    ) -> ObjectResult<UploadRequestId> {
        self.provenance.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;
        if content_hash == ZERO_HASH {
            return Err(ObjectError::InvalidInput {
                field: "content_hash",
                reason: "must not be zero",
            });
        }

        let mut store = self.store.write();
        let good = self
            .goods
            .good_summary(good_id)
            .ok_or(ObjectError::GoodNotFound { good_id })?;
        if caller != good.holder && caller != good.producer {
            return Err(Denied::NotParty {
                actor: caller,
                party: "holder or producer",
            }
            .into());
        }
        // Deactivation only happens at origin.
        let reached = match good.stage {
            Stage::Deactivated => Stage::Origin,
            current => current,
        };
        if stage == Stage::Deactivated || stage > reached {
            return Err(ObjectError::InvalidInput {
                field: "stage",
                reason: "good has not reached this stage",
            });
        }
        let pending = store.for_good(good_id).iter().filter(|r| r.is_pending()).count();
        if pending >= self.config.max_pending_per_good {
            return Err(ObjectError::PendingLimit {
                good_id,
                limit: self.config.max_pending_per_good,
            });
        }

        let request = UploadRequest {
            id: store.next_id(),
            good_id,
            requester: caller,
            content_hash,
            file_kind,
            stage,
            status: UploadStatus::Pending,
            requested_at: self.clock.now(),
            resolved_at: None,
        };
        let record = self
            .record("request_upload", request.id)
            .field("content_hash", request.content_hash_hex())
            .field("file_kind", file_kind.as_str())
            .field("stage", stage);
        self.provenance
            .append(AuditScope::Good(good_id), record.by(caller))?;
        let id = request.id;
        store.put(request);

        info!(request = %id, good = %good_id, kind = %file_kind, by = %caller, "Upload requested");
        Ok(id)
    }

    fn report_upload_result(
        &self,
        caller: ActorId,
        request_id: UploadRequestId,
        outcome: UploadOutcome,
    ) -> ObjectResult<UploadRequest> {
        self.provenance.ensure_writable()?;
        self.check_reporter(&caller)?;
        self.check_outcome(&outcome)?;

        let mut store = self.store.write();
        let current = store
            .get(request_id)
            .ok_or(ObjectError::RequestNotFound { request_id })?;
        if !current.is_pending() {
            return Err(ObjectError::AlreadyResolved { request_id });
        }

        let mut updated = current;
        updated.status = match outcome {
            UploadOutcome::Completed { reference } => UploadStatus::Completed { reference },
            UploadOutcome::Failed { error } => UploadStatus::Failed { error },
        };
        updated.resolved_at = Some(self.clock.now());

        let mut record = self
            .record("report_upload_result", request_id)
            .field("status", updated.status.as_str());
        match &updated.status {
            UploadStatus::Completed { reference } => record = record.field("reference", reference),
            UploadStatus::Failed { error } => record = record.field("error", error),
            UploadStatus::Pending => {}
        }
        self.provenance
            .append(AuditScope::Good(updated.good_id), record.by(caller))?;
        store.put(updated.clone());

        match &updated.status {
            UploadStatus::Failed { error } => {
                warn!(request = %request_id, good = %updated.good_id, error = %error, "Upload failed")
            }
            _ => info!(request = %request_id, good = %updated.good_id, "Upload completed"),
        }
        Ok(updated)
    }

    fn verify_integrity(
        &self,
        request_id: UploadRequestId,
        expected_hash: &Hash,
    ) -> ObjectResult<IntegrityReport> {
        let request = self
            .store
            .read()
            .get(request_id)
            .ok_or(ObjectError::RequestNotFound { request_id })?;
        let report = IntegrityReport {
            request_id,
            completed: request.reference().is_some(),
            hash_matches: &request.content_hash == expected_hash,
            reference: request.reference().map(str::to_string),
        };
        debug!(request = %request_id, intact = report.is_intact(), "Integrity checked");
        Ok(report)
    }

    fn get_request(&self, request_id: UploadRequestId) -> Option<UploadRequest> {
        self.store.read().get(request_id)
    }

    fn attachments_for_good(&self, good_id: GoodId) -> Vec<UploadRequest> {
        self.store
            .read()
            .for_good(good_id)
            .into_iter()
            .filter(|r| r.reference().is_some())
            .collect()
    }
}

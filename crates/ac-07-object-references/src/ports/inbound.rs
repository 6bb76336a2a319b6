//! # Inbound Ports (Driving Ports / API)

use crate::domain::{FileKind, IntegrityReport, ObjectResult, UploadOutcome, UploadRequest};
use shared_types::{ActorId, GoodId, Hash, Stage, UploadRequestId};

/// Two-phase off-chain object references.
///
/// Phase one commits the content hash; phase two, reported by a storage
/// operator, records where the object ended up.
pub trait ObjectReferenceApi: Send + Sync {
    /// Current holder or originating producer of the good.
    fn request_upload(
        &self,
        caller: ActorId,
        good_id: GoodId,
        content_hash: Hash,
        file_kind: FileKind,
        stage: Stage,
    ) -> ObjectResult<UploadRequestId>;

    /// Administrator or configured operator, once per request.
    fn report_upload_result(
        &self,
        caller: ActorId,
        request_id: UploadRequestId,
        outcome: UploadOutcome,
    ) -> ObjectResult<UploadRequest>;

    fn verify_integrity(
        &self,
        request_id: UploadRequestId,
        expected_hash: &Hash,
    ) -> ObjectResult<IntegrityReport>;

    fn get_request(&self, request_id: UploadRequestId) -> Option<UploadRequest>;

    /// Completed uploads for the good.
    fn attachments_for_good(&self, good_id: GoodId) -> Vec<UploadRequest>;
}

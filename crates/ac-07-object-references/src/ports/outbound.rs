//! # Outbound Ports (Driven Ports)

use crate::domain::UploadRequest;
use shared_types::{GoodId, UploadRequestId};

/// Upload request persistence.
///
/// Testing: `InMemoryUploadStore` (adapters/memory.rs)
pub trait UploadStore: Send + Sync {
    fn next_id(&self) -> UploadRequestId;

    fn get(&self, id: UploadRequestId) -> Option<UploadRequest>;

    fn put(&mut self, request: UploadRequest);

    /// Requests for `good_id`, oldest first.
    fn for_good(&self, good_id: GoodId) -> Vec<UploadRequest>;
}

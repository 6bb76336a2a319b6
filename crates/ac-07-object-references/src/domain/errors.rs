//! Error types for object references.

use shared_types::{
    Classified, Denied, ErrorKind, GoodId, ProvenanceFault, UploadRequestId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Good not found: {good_id}")]
    GoodNotFound { good_id: GoodId },

    #[error("Upload request not found: {request_id}")]
    RequestNotFound { request_id: UploadRequestId },

    #[error("Upload request {request_id} already resolved")]
    AlreadyResolved { request_id: UploadRequestId },

    #[error("Good {good_id} already has {limit} pending uploads")]
    PendingLimit { good_id: GoodId, limit: usize },

    #[error(transparent)]
    Denied(#[from] Denied),

    #[error(transparent)]
    Fault(#[from] ProvenanceFault),
}

impl Classified for ObjectError {
    fn kind(&self) -> ErrorKind {
        match self {
            ObjectError::InvalidInput { .. } => ErrorKind::Validation,
            ObjectError::GoodNotFound { .. } | ObjectError::RequestNotFound { .. } => {
                ErrorKind::NotFound
            }
            ObjectError::AlreadyResolved { .. } | ObjectError::PendingLimit { .. } => {
                ErrorKind::State
            }
            ObjectError::Denied(_) => ErrorKind::Authorization,
            ObjectError::Fault(_) => ErrorKind::Fatal,
        }
    }
}

pub type ObjectResult<T> = Result<T, ObjectError>;

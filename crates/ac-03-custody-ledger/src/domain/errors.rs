//! Error types for the custody ledger.

use shared_types::{ActorId, Classified, Denied, ErrorKind, GoodId, ProvenanceFault, Stage};
use thiserror::Error;

/// Custody ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Good code {code} already registered as {existing}")]
    DuplicateCode { code: String, existing: GoodId },

    #[error("Attestation must not be empty")]
    EmptyAttestation,

    #[error("Good not found: {good_id}")]
    GoodNotFound { good_id: GoodId },

    /// Deactivated goods behave as missing for stage advances.
    #[error("Good {good_id} is deactivated")]
    GoodDeactivated { good_id: GoodId },

    #[error("Invalid transition for {good_id}: {from} -> {to}")]
    InvalidTransition {
        good_id: GoodId,
        from: Stage,
        to: Stage,
    },

    #[error("Good {good_id} is {actual}, expected {expected}")]
    InvalidState {
        good_id: GoodId,
        actual: Stage,
        expected: &'static str,
    },

    /// Transfer signal names a sender that no longer holds the good.
    #[error("Good {good_id} is held by {holder}, not {sender}")]
    HolderMismatch {
        good_id: GoodId,
        holder: ActorId,
        sender: ActorId,
    },

    #[error(transparent)]
    Denied(#[from] Denied),

    #[error(transparent)]
    Fault(#[from] ProvenanceFault),
}

impl Classified for CustodyError {
    fn kind(&self) -> ErrorKind {
        match self {
            CustodyError::InvalidInput { .. } | CustodyError::EmptyAttestation => {
                ErrorKind::Validation
            }
            CustodyError::DuplicateCode { .. } => ErrorKind::Uniqueness,
            CustodyError::GoodNotFound { .. } | CustodyError::GoodDeactivated { .. } => {
                ErrorKind::NotFound
            }
            CustodyError::InvalidTransition { .. }
            | CustodyError::InvalidState { .. }
            | CustodyError::HolderMismatch { .. } => ErrorKind::State,
            CustodyError::Denied(_) => ErrorKind::Authorization,
            CustodyError::Fault(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for custody operations.
pub type CustodyResult<T> = Result<T, CustodyError>;

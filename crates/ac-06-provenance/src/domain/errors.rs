//! Error types for the provenance subsystem.

use shared_types::{Classified, Denied, ErrorKind, GoodId, ProvenanceFault};
use thiserror::Error;

/// Provenance ledger and token errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    /// No token with this code was ever issued.
    #[error("Verification token not found: {code}")]
    TokenNotFound { code: String },

    /// Good is unknown to the custody ledger.
    #[error("Good not found: {good_id}")]
    GoodNotFound { good_id: GoodId },

    /// Good exists but can no longer be vouched for.
    #[error("Good {good_id} is deactivated")]
    GoodInactive { good_id: GoodId },

    #[error("Verification token {code} is already inactive")]
    AlreadyInactive { code: String },

    #[error(transparent)]
    Denied(#[from] Denied),

    #[error(transparent)]
    Fault(#[from] ProvenanceFault),
}

impl Classified for ProvenanceError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProvenanceError::TokenNotFound { .. }
            | ProvenanceError::GoodNotFound { .. }
            | ProvenanceError::GoodInactive { .. } => ErrorKind::NotFound,
            ProvenanceError::AlreadyInactive { .. } => ErrorKind::State,
            ProvenanceError::Denied(_) => ErrorKind::Authorization,
            ProvenanceError::Fault(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for provenance operations.
pub type ProvenanceResult<T> = Result<T, ProvenanceError>;

/// Failure reported by an [`EntryStore`](crate::ports::outbound::EntryStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entry store full at {capacity} entries")]
    Full { capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ProvenanceError::TokenNotFound { code: "VT-1".into() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ProvenanceError::AlreadyInactive { code: "VT-1".into() }.kind(),
            ErrorKind::State
        );
        assert!(ProvenanceError::from(ProvenanceFault::Halted).is_fatal());
    }
}

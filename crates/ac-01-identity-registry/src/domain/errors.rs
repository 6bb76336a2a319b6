//! Error types for the identity registry.

use shared_types::{ActorId, Classified, Denied, ErrorKind, ProvenanceFault, Role};
use thiserror::Error;

/// Identity registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Empty, oversized or otherwise malformed field.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Actor already registered: {actor}")]
    DuplicateActor { actor: ActorId },

    #[error("License {license} already held by {holder}")]
    DuplicateLicense { license: String, holder: ActorId },

    #[error("Actor not found: {actor}")]
    ActorNotFound { actor: ActorId },

    /// Requested status or role is already in effect.
    #[error("Actor {actor} is already {state}")]
    AlreadyInState { actor: ActorId, state: String },

    /// Change would leave no governing administrator.
    #[error("Actor {actor} is the last active administrator")]
    LastAdministrator { actor: ActorId },

    #[error(transparent)]
    Denied(#[from] Denied),

    #[error(transparent)]
    Fault(#[from] ProvenanceFault),
}

impl IdentityError {
    pub(crate) fn already(actor: ActorId, state: impl Into<String>) -> Self {
        IdentityError::AlreadyInState {
            actor,
            state: state.into(),
        }
    }

    pub(crate) fn already_role(actor: ActorId, role: Role) -> Self {
        Self::already(actor, role.as_str())
    }
}

impl Classified for IdentityError {
    fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidInput { .. } => ErrorKind::Validation,
            IdentityError::DuplicateActor { .. } | IdentityError::DuplicateLicense { .. } => {
                ErrorKind::Uniqueness
            }
            IdentityError::ActorNotFound { .. } => ErrorKind::NotFound,
            IdentityError::AlreadyInState { .. } | IdentityError::LastAdministrator { .. } => {
                ErrorKind::State
            }
            IdentityError::Denied(_) => ErrorKind::Authorization,
            IdentityError::Fault(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

//! # Error Types
//!
//! The error taxonomy shared by every subsystem, the authorization failure
//! produced by capability checks, and the fatal provenance fault.

use crate::entities::{ActorId, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse error category every subsystem error maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Empty or malformed input.
    Validation,
    /// Wrong role, inactive, blacklisted, or not the required party.
    Authorization,
    /// Unknown or deactivated entity.
    NotFound,
    /// Invalid transition, already in target state, expired, not yet eligible.
    State,
    /// Duplicate license, code or tracking number.
    Uniqueness,
    /// The audit trail can no longer be written. Requires an operator.
    Fatal,
}

/// Implemented by every subsystem error enum.
pub trait Classified {
    fn kind(&self) -> ErrorKind;

    fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}

/// Why a capability check rejected a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denied {
    #[error("actor {actor} is not registered")]
    Unregistered { actor: ActorId },

    #[error("actor {actor} is deactivated")]
    Inactive { actor: ActorId },

    #[error("actor {actor} is blacklisted")]
    Blacklisted { actor: ActorId },

    #[error("actor {actor} has role {actual}, operation requires one of {required:?}")]
    WrongRole {
        actor: ActorId,
        actual: Role,
        required: &'static [Role],
    },

    #[error("actor {actor} is not the {party}")]
    NotParty { actor: ActorId, party: &'static str },
}

impl Classified for Denied {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Authorization
    }
}

/// Failure of the audit write path. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceFault {
    #[error("provenance storage exhausted at {capacity} entries")]
    StorageExhausted { capacity: usize },

    #[error("provenance ledger halted awaiting operator intervention")]
    Halted,
}

impl Classified for ProvenanceFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Fatal
    }
}

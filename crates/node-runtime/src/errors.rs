//! Errors surfaced by the node façade.

use ac_01_identity_registry::IdentityError;
use ac_03_custody_ledger::CustodyError;
use ac_04_marketplace::MarketError;
use ac_05_logistics::LogisticsError;
use ac_06_provenance::ProvenanceError;
use ac_07_object_references::ObjectError;
use shared_types::{Classified, ErrorKind};
use thiserror::Error;

/// Any subsystem error, tagged by the subsystem that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("custody: {0}")]
    Custody(#[from] CustodyError),

    #[error("marketplace: {0}")]
    Market(#[from] MarketError),

    #[error("logistics: {0}")]
    Logistics(#[from] LogisticsError),

    #[error("provenance: {0}")]
    Provenance(#[from] ProvenanceError),

    #[error("object references: {0}")]
    Objects(#[from] ObjectError),
}

impl Classified for NodeError {
    fn kind(&self) -> ErrorKind {
        match self {
            NodeError::Identity(e) => e.kind(),
            NodeError::Custody(e) => e.kind(),
            NodeError::Market(e) => e.kind(),
            NodeError::Logistics(e) => e.kind(),
            NodeError::Provenance(e) => e.kind(),
            NodeError::Objects(e) => e.kind(),
        }
    }
}

pub type NodeResult<T> = Result<T, NodeError>;

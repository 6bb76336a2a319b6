//! Domain layer for the provenance ledger.

pub mod chain;
pub mod config;
pub mod entry;
pub mod errors;
pub mod token;

pub use chain::{verify_chain, verify_claim, ChainMismatch, ChainReport, ClaimVerdict, MismatchReason};
pub use config::ProvenanceConfig;
pub use entry::{compute_entry_hash, ChainHead, ProvenanceEntry};
pub use errors::{ProvenanceError, ProvenanceResult, StoreError};
pub use token::{derive_code, VerificationReport, VerificationToken, TOKEN_PREFIX};

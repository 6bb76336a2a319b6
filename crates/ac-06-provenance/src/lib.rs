//! # ac-06-provenance
//!
//! Append-only, hash-linked audit trail for every state change in the
//! system, plus portable verification tokens.
//!
//! ## Overview
//!
//! - **Per-scope chains**: one chain per good and one per actor, each link
//!   sealed as `SHA-256(payload_hash ‖ previous_hash ‖ sequence)`.
//! - **Single write path**: [`ProvenanceSink::append`] is the only way an
//!   entry reaches the [`EntryStore`]; the store port has no update.
//! - **Fatal exhaustion**: a full store halts the ledger until an operator
//!   intervenes.
//! - **Independent verification**: [`verify_chain`] and [`verify_claim`]
//!   recompute every hash from stored payloads.
//!
//! ## Architecture
//!
//! ```text
//! Identity / Custody / Market / Logistics ──append──→ ProvenanceLedger
//!                                                        │
//!                                                        ├── EntryStore (append-only)
//!                                                        └── EventPublisher (outbox)
//!
//! Third party ──code──→ VerificationService ──→ GoodView + verify_chain
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ac_06_provenance::{InMemoryEntryStore, ProvenanceLedger};
//!
//! let ledger = ProvenanceLedger::new(InMemoryEntryStore::new(10_000), bus);
//! let receipt = ledger.append(scope, record)?;
//! assert!(ledger.verify_chain(&scope).intact);
//! ```
//!
//! [`ProvenanceSink::append`]: shared_types::ProvenanceSink::append

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod verification;

pub use adapters::InMemoryEntryStore;
pub use domain::{
    compute_entry_hash, verify_chain, verify_claim, ChainHead, ChainMismatch, ChainReport,
    ClaimVerdict, MismatchReason, ProvenanceConfig, ProvenanceEntry, ProvenanceError,
    ProvenanceResult, StoreError, VerificationReport, VerificationToken,
};
pub use ports::inbound::{ProvenanceApi, VerificationApi};
pub use ports::outbound::EntryStore;
pub use service::ProvenanceLedger;
pub use verification::VerificationService;

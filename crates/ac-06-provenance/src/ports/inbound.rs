//! # Inbound Ports (Driving Ports / API)
//!
//! Read and verification surface of the provenance subsystem. The write
//! path is the [`ProvenanceSink`](shared_types::ProvenanceSink) port.

use crate::domain::{
    ChainReport, ClaimVerdict, ProvenanceEntry, ProvenanceResult, VerificationReport,
    VerificationToken,
};
use shared_types::{ActorId, AuditScope, GoodId};

/// Chain inspection.
pub trait ProvenanceApi: Send + Sync {
    /// All entries of `scope`, in order.
    fn entries_for(&self, scope: &AuditScope) -> Vec<ProvenanceEntry>;

    /// Replay `scope`'s chain from stored payloads.
    fn verify_chain(&self, scope: &AuditScope) -> ChainReport;

    /// Check a presented history against the stored chain.
    fn verify_claim(&self, claimed: &[ProvenanceEntry]) -> ClaimVerdict;

    /// Entries stored across all scopes.
    fn entry_count(&self) -> usize;

    /// Whether the ledger has stopped accepting writes.
    fn is_halted(&self) -> bool;
}

/// Verification tokens.
pub trait VerificationApi: Send + Sync {
    /// Issue a fresh code for a good the caller currently holds.
    fn issue_token(&self, caller: ActorId, good_id: GoodId) -> ProvenanceResult<VerificationToken>;

    /// Resolve a code. Integrity failures are reported, never raised.
    fn verify_token(&self, code: &str) -> ProvenanceResult<VerificationReport>;

    /// Retire a code. Issuer or administrator only.
    fn deactivate_token(&self, caller: ActorId, code: &str) -> ProvenanceResult<VerificationToken>;

    fn get_token(&self, code: &str) -> Option<VerificationToken>;

    /// Every token issued for `good_id`, oldest first.
    fn tokens_for_good(&self, good_id: GoodId) -> Vec<VerificationToken>;
}

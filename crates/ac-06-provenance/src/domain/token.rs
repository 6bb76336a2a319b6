//! # Verification Tokens
//!
//! Portable codes a holder hands to a third party. Resolving a code returns
//! the good's current summary and the integrity of its chain.

use crate::domain::chain::ChainMismatch;
use serde::{Deserialize, Serialize};
use shared_types::{sha256, ActorId, GoodId, GoodSummary, Timestamp};

/// Prefix of every issued code.
pub const TOKEN_PREFIX: &str = "VT-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub code: String,
    pub good_id: GoodId,
    pub issuer: ActorId,
    pub active: bool,
    pub issued_at: Timestamp,
    pub deactivated_at: Option<Timestamp>,
}

/// What a third party learns from a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub code: String,
    pub good_id: GoodId,
    /// Token active, good known and chain intact.
    pub valid: bool,
    pub token_active: bool,
    pub snapshot: Option<GoodSummary>,
    pub chain_intact: bool,
    pub stage_count: usize,
    pub entry_count: usize,
    pub first_mismatch: Option<ChainMismatch>,
    pub verified_at: Timestamp,
}

/// Derive an opaque code from a random nonce and the issuing context.
///
/// `code_bytes` digest bytes are hex-encoded after the prefix.
pub fn derive_code(
    nonce: &[u8; 32],
    good_id: GoodId,
    issuer: &ActorId,
    now: Timestamp,
    code_bytes: usize,
) -> String {
    let mut material = Vec::with_capacity(32 + 8 + 20 + 8);
    material.extend_from_slice(nonce);
    material.extend_from_slice(&good_id.0.to_le_bytes());
    material.extend_from_slice(&issuer.0);
    material.extend_from_slice(&now.to_le_bytes());
    let digest = sha256(&material);
    let take = code_bytes.clamp(8, digest.len());
    format!("{TOKEN_PREFIX}{}", hex::encode_upper(&digest[..take]))
}

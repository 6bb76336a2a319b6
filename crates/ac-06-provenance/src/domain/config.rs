//! Configuration for the provenance subsystem.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Maximum entries across all chains before the ledger halts.
    pub max_entries: usize,
    /// Digest bytes encoded into each token code.
    pub token_code_bytes: usize,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000_000,
            token_code_bytes: 16,
        }
    }
}

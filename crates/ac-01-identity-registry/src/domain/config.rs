//! Configuration for the identity registry.

use serde::{Deserialize, Serialize};
use shared_types::ActorId;

/// Identity registry configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Administrator seeded at genesis so that `register` is reachable.
    pub bootstrap_admin: ActorId,
    pub bootstrap_name: String,
    pub bootstrap_license: String,
    /// Upper bound on any free-text profile field, in bytes.
    pub max_field_len: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            bootstrap_admin: ActorId::repeat(0xAD),
            bootstrap_name: "Genesis Administrator".to_string(),
            bootstrap_license: "GENESIS-ADMIN".to_string(),
            max_field_len: 256,
        }
    }
}

//! Configuration for object references.

use serde::{Deserialize, Serialize};
use shared_types::ActorId;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Storage operators allowed to report upload results besides administrators.
    pub operators: Vec<ActorId>,
    pub max_reference_len: usize,
    pub max_error_len: usize,
    /// Unresolved requests allowed per good.
    pub max_pending_per_good: usize,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            operators: Vec::new(),
            max_reference_len: 512,
            max_error_len: 512,
            max_pending_per_good: 16,
        }
    }
}

impl ObjectConfig {
    pub fn is_operator(&self, actor: &ActorId) -> bool {
        self.operators.contains(actor)
    }
}

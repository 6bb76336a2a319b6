//! Configuration for the condition gateway.

use serde::{Deserialize, Serialize};
use shared_types::ConditionKind;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Readings older than this are reported as stale.
    pub max_age_secs: u64,
    /// Per-kind override of `max_age_secs`.
    pub max_age_overrides: BTreeMap<ConditionKind, u64>,
    /// Fixed values served by a static feed; empty means no static feed.
    pub static_values: BTreeMap<ConditionKind, f64>,
}

impl GatewayConfig {
    pub fn max_age_for(&self, kind: ConditionKind) -> u64 {
        self.max_age_overrides
            .get(&kind)
            .copied()
            .unwrap_or(self.max_age_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 3_600,
            max_age_overrides: BTreeMap::new(),
            static_values: BTreeMap::new(),
        }
    }
}

use crate::domain::ProviderError;
use crate::ports::outbound::ConditionProvider;
use parking_lot::RwLock;
use shared_types::{ConditionKind, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Values pushed in by an external operator.
#[derive(Default)]
pub struct ManualFeed {
    values: RwLock<HashMap<ConditionKind, (f64, Timestamp)>>,
    offline: AtomicBool,
}

impl ManualFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ConditionKind, value: f64, as_of: Timestamp) {
        self.values.write().insert(kind, (value, as_of));
    }

    pub fn clear(&self, kind: ConditionKind) {
        self.values.write().remove(&kind);
    }

    /// Simulate the operator's upstream going away.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl ConditionProvider for ManualFeed {
    fn name(&self) -> &str {
        "manual"
    }

    fn get_latest(&self, kind: ConditionKind) -> Result<(f64, Timestamp), ProviderError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Unreachable {
                reason: "manual feed offline".to_string(),
            });
        }
        self.values
            .read()
            .get(&kind)
            .copied()
            .ok_or(ProviderError::NoData { kind })
    }
}

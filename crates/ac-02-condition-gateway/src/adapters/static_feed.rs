use crate::domain::ProviderError;
use crate::ports::outbound::ConditionProvider;
use shared_types::{ConditionKind, TimeSource, Timestamp};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serves fixed values, always stamped with the current time.
pub struct StaticFeed {
    values: BTreeMap<ConditionKind, f64>,
    clock: Arc<dyn TimeSource>,
}

impl StaticFeed {
    pub fn new(values: BTreeMap<ConditionKind, f64>, clock: Arc<dyn TimeSource>) -> Self {
        Self { values, clock }
    }

    pub fn kinds(&self) -> Vec<ConditionKind> {
        self.values.keys().copied().collect()
    }
}

impl ConditionProvider for StaticFeed {
    fn name(&self) -> &str {
        "static"
    }

    fn get_latest(&self, kind: ConditionKind) -> Result<(f64, Timestamp), ProviderError> {
        self.values
            .get(&kind)
            .map(|&value| (value, self.clock.now()))
            .ok_or(ProviderError::NoData { kind })
    }
}

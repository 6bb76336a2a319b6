//! # Inbound Ports (Driving Ports / API)

use crate::domain::SuitabilityThresholds;
use shared_types::{ConditionKind, ConditionReading, ConditionSnapshot};

/// Condition gateway API. Read-only and infallible.
pub trait ConditionApi: Send + Sync {
    /// Latest normalized reading for one condition.
    fn reading(&self, kind: ConditionKind) -> ConditionReading;

    /// Readings for every tracked condition.
    fn snapshot(&self) -> ConditionSnapshot;

    /// Current readings checked against caller thresholds.
    fn is_suitable_for(&self, good_kind: &str, thresholds: &SuitabilityThresholds) -> bool;

    /// Conditions with a configured provider.
    fn configured_kinds(&self) -> Vec<ConditionKind>;
}

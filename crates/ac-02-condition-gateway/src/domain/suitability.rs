//! Pure suitability check over a condition snapshot.

use serde::{Deserialize, Serialize};
use shared_types::{ConditionKind, ConditionSnapshot};

/// Caller-supplied bounds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityThresholds {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
    pub max_rainfall: f64,
}

/// Whether temperature, humidity and rainfall in `snapshot` all fall within
/// `thresholds`. A missing reading or an inverted range is unsuitable.
pub fn evaluate(snapshot: &ConditionSnapshot, thresholds: &SuitabilityThresholds) -> bool {
    let (Some(t), Some(h), Some(rain)) = (
        snapshot.value(ConditionKind::Temperature),
        snapshot.value(ConditionKind::Humidity),
        snapshot.value(ConditionKind::Rainfall),
    ) else {
        return false;
    };

    (thresholds.min_temperature..=thresholds.max_temperature).contains(&t)
        && (thresholds.min_humidity..=thresholds.max_humidity).contains(&h)
        && rain <= thresholds.max_rainfall
}

//! # Reading Normalization
//!
//! | Condition | Neutral default |
//! |-----------|-----------------|
//! | temperature | 20.0 °C |
//! | humidity | 50.0 % |
//! | rainfall | 0.0 mm |
//! | wind speed | 0.0 m/s |
//! | market price | 0.0 (unknown) |

use shared_types::{ConditionKind, ConditionReading, ReadingSource, Staleness, Timestamp};

pub fn neutral_default(kind: ConditionKind) -> f64 {
    match kind {
        ConditionKind::Temperature => 20.0,
        ConditionKind::Humidity => 50.0,
        ConditionKind::Rainfall => 0.0,
        ConditionKind::WindSpeed => 0.0,
        ConditionKind::MarketPrice => 0.0,
    }
}

/// Reading used when no live value is available.
pub fn neutral_reading(kind: ConditionKind, now: Timestamp) -> ConditionReading {
    ConditionReading {
        kind,
        value: neutral_default(kind),
        as_of: now,
        source: ReadingSource::NeutralDefault,
        staleness: Staleness::Unavailable,
    }
}

/// Classify a live value's age. Future timestamps count as fresh.
pub fn classify(as_of: Timestamp, now: Timestamp, max_age_secs: u64) -> Staleness {
    let age = now.saturating_sub(as_of);
    if age > max_age_secs {
        Staleness::Stale { age_secs: age }
    } else {
        Staleness::Fresh
    }
}

//! # Condition Readings
//!
//! Normalized values from external condition feeds, as consumed by the
//! custody ledger when it snapshots conditions into a stage record.

use crate::entities::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked external condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Degrees Celsius.
    Temperature,
    /// Relative humidity, percent.
    Humidity,
    /// Millimetres over the feed's window.
    Rainfall,
    /// Metres per second.
    WindSpeed,
    /// Market price per unit, in the ledger's price unit.
    MarketPrice,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 5] = [
        ConditionKind::Temperature,
        ConditionKind::Humidity,
        ConditionKind::Rainfall,
        ConditionKind::WindSpeed,
        ConditionKind::MarketPrice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionKind::Temperature => "temperature",
            ConditionKind::Humidity => "humidity",
            ConditionKind::Rainfall => "rainfall",
            ConditionKind::WindSpeed => "wind_speed",
            ConditionKind::MarketPrice => "market_price",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingSource {
    /// Reported by a configured provider.
    Live,
    /// Provider missing, unreachable or returned garbage.
    NeutralDefault,
}

/// Age classification of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Staleness {
    Fresh,
    Stale { age_secs: u64 },
    /// No live value; the reading is the neutral default.
    Unavailable,
}

/// One normalized reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionReading {
    pub kind: ConditionKind,
    pub value: f64,
    pub as_of: Timestamp,
    pub source: ReadingSource,
    pub staleness: Staleness,
}

impl ConditionReading {
    /// A live value that can be trusted for threshold checks.
    pub fn is_fresh_live(&self) -> bool {
        self.source == ReadingSource::Live && self.staleness == Staleness::Fresh
    }
}

/// Readings for every tracked condition at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSnapshot {
    pub taken_at: Timestamp,
    pub readings: Vec<ConditionReading>,
}

impl ConditionSnapshot {
    pub fn get(&self, kind: ConditionKind) -> Option<&ConditionReading> {
        self.readings.iter().find(|r| r.kind == kind)
    }

    /// Value of `kind`, if present in the snapshot.
    pub fn value(&self, kind: ConditionKind) -> Option<f64> {
        self.get(kind).map(|r| r.value)
    }
}

//! Configuration for the custody ledger.

use serde::{Deserialize, Serialize};

/// Thresholds that raise stage-record alerts. Alerts never block a transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Lowest acceptable live temperature, °C.
    pub min_temperature: f64,
    /// Highest acceptable live temperature, °C.
    pub max_temperature: f64,
    /// Allowed deviation from the previous recorded estimate, percent.
    pub estimate_deviation_pct: f64,
    /// Allowed deviation from the live market price feed, percent.
    pub feed_deviation_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            min_temperature: 0.0,
            max_temperature: 30.0,
            estimate_deviation_pct: 10.0,
            feed_deviation_pct: 5.0,
        }
    }
}

/// Custody ledger configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustodyConfig {
    pub alerts: AlertThresholds,
    pub limits: FieldLimits,
}

/// Input bounds, in bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub max_code_len: usize,
    pub max_name_len: usize,
    pub max_attestation_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_code_len: 64,
            max_name_len: 256,
            max_attestation_len: 4096,
        }
    }
}

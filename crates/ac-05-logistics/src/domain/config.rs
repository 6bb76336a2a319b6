//! Configuration for the logistics tracker.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsConfig {
    pub max_tracking_code_len: usize,
    pub max_location_len: usize,
    pub max_note_len: usize,
    /// Checkpoints kept per shipment, including the creation entry.
    pub max_checkpoints: usize,
}

impl Default for LogisticsConfig {
    fn default() -> Self {
        Self {
            max_tracking_code_len: 64,
            max_location_len: 256,
            max_note_len: 1024,
            max_checkpoints: 64,
        }
    }
}

//! Domain layer for the custody ledger.

pub mod alerts;
pub mod config;
pub mod entities;
pub mod errors;

pub use alerts::{deviation_pct, evaluate_alerts, Alert};
pub use config::{AlertThresholds, CustodyConfig, FieldLimits};
pub use entities::{Attestation, BatchEntry, Good, NewGood, StageRecord, SupplyChainStats};
pub use errors::{CustodyError, CustodyResult};

//! # ac-03-custody-ledger
//!
//! Tracks each good through its custody stages and records who moved it,
//! what they attested and the external conditions at that moment.
//!
//! ## Lifecycle
//!
//! ```text
//! Origin ──Processor──→ Processing ──Distributor──→ Distribution ──Retailer──→ Retail
//!   │                                                                            │
//!   └──originating Producer──→ Deactivated                   Consumed ←──any─────┘
//! ```
//!
//! The caller's role selects the target stage, so a processor can only ever
//! move a good into `Processing`. Each stage record carries a
//! [`ConditionSnapshot`](shared_types::ConditionSnapshot) and any [`Alert`]s
//! raised against the configured thresholds; alerts never block.
//!
//! Holder changes outside a stage advance arrive as a
//! [`CustodyTransfer`](shared_types::CustodyTransfer) from logistics.
//!
//! Every mutation appends one provenance entry scoped to the good.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryGoodStore;
pub use domain::{
    deviation_pct, evaluate_alerts, Alert, AlertThresholds, Attestation, BatchEntry,
    CustodyConfig, CustodyError, CustodyResult, FieldLimits, Good, NewGood, StageRecord,
    SupplyChainStats,
};
pub use ports::inbound::CustodyApi;
pub use ports::outbound::GoodStore;
pub use service::CustodyLedger;

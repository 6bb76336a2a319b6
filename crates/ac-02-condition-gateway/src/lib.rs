//! # ac-02-condition-gateway
//!
//! Read-only façade over external condition feeds: temperature, humidity,
//! rainfall, wind speed and market price.
//!
//! Each reading carries its source and a staleness class. A condition with
//! no provider, a failing provider, or a garbage value yields the neutral
//! default so downstream logic never blocks on external data.
//!
//! ```text
//! ConditionProvider (StaticFeed | ManualFeed | ...) ──get_latest──→ ConditionGateway
//!                                                                   │
//!                                           CustodyLedger ←─snapshot┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ManualFeed, StaticFeed};
pub use domain::{
    evaluate, neutral_default, GatewayConfig, ProviderError, SuitabilityThresholds,
};
pub use ports::inbound::ConditionApi;
pub use ports::outbound::ConditionProvider;
pub use service::ConditionGateway;

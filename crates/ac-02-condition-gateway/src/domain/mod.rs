//! Domain layer for the condition gateway.

pub mod config;
pub mod errors;
pub mod readings;
pub mod suitability;

pub use config::GatewayConfig;
pub use errors::ProviderError;
pub use readings::{classify, neutral_default, neutral_reading};
pub use suitability::{evaluate, SuitabilityThresholds};

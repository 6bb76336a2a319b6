//! Error types for condition providers.
//!
//! These never escape the gateway: a failing provider degrades to the
//! neutral default.

use shared_types::ConditionKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("Provider unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("Provider has no value for {kind}")]
    NoData { kind: ConditionKind },
}

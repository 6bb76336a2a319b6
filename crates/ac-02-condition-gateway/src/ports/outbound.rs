//! # Outbound Ports (Driven Ports)

use crate::domain::ProviderError;
use shared_types::{ConditionKind, Timestamp};

/// A pull-based external condition feed.
///
/// Implementations do no retrying; the gateway degrades any error to the
/// neutral default.
pub trait ConditionProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Latest value and the time it was measured.
    fn get_latest(&self, kind: ConditionKind) -> Result<(f64, Timestamp), ProviderError>;
}

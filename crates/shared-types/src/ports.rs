//! # Cross-Subsystem Ports
//!
//! Read-only views one subsystem exposes to the others, the audit write
//! port, and the clock. Subsystems receive these as injected trait objects
//! so any of them can be replaced by an in-memory double in tests.

use crate::audit::{AuditScope, EntryReceipt, OperationRecord};
use crate::conditions::ConditionSnapshot;
use crate::entities::{ActorId, ActorStanding, GoodId, GoodSummary, OfferId, OfferSettlement, Timestamp};
use crate::errors::ProvenanceFault;
use std::sync::atomic::{AtomicU64, Ordering};

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and scripted replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Actor lookups for authorization. Implemented by the identity registry.
pub trait ActorDirectory: Send + Sync {
    fn standing(&self, actor: &ActorId) -> Option<ActorStanding>;
}

/// Custody lookups. Implemented by the custody ledger.
pub trait GoodView: Send + Sync {
    fn good_summary(&self, id: GoodId) -> Option<GoodSummary>;
}

/// Latest external conditions. Implemented by the condition gateway.
pub trait ConditionReader: Send + Sync {
    fn snapshot(&self) -> ConditionSnapshot;
}

/// Offer settlement lookups. Implemented by the marketplace.
pub trait OfferSettlementView: Send + Sync {
    fn settlement(&self, id: OfferId) -> Option<OfferSettlement>;
}

/// The audit write path.
///
/// Every mutating operation calls `ensure_writable` before touching its own
/// state and `append` as its final step, while still holding its own lock.
pub trait ProvenanceSink: Send + Sync {
    /// Fails only when the ledger is halted or full.
    fn ensure_writable(&self) -> Result<(), ProvenanceFault>;

    /// Append one entry to `scope`'s chain.
    fn append(&self, scope: AuditScope, record: OperationRecord)
        -> Result<EntryReceipt, ProvenanceFault>;
}

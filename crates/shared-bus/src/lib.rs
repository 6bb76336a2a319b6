//! # Shared Bus - Outbound Notifications
//!
//! Every committed provenance entry is turned into a [`LedgerEvent`] and
//! written here for external indexers and dashboards.
//!
//! ## Delivery Model
//!
//! ```text
//! ┌──────────────┐   append()   ┌──────────────┐  publish()  ┌──────────────┐
//! │  Subsystem   │ ───────────→ │  Provenance  │ ──────────→ │  Event Bus   │
//! └──────────────┘              └──────────────┘             └──────┬───────┘
//!                                                                   │
//!                                        ┌──────────────────────────┤
//!                                        ↓                          ↓
//!                                  outbox (query by index)   broadcast subscribers
//! ```
//!
//! - **Outbox:** retained window of events, readable with `events_since`.
//!   Consumers that fall behind the window re-read the provenance ledger.
//! - **Subscriptions:** broadcast in commit order. A subscriber that lags
//!   the channel replays the gap from the outbox and only loses events the
//!   outbox has already evicted.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
mod outbox;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Default number of events retained in the outbox.
pub const DEFAULT_OUTBOX_RETENTION: usize = 100_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
        assert!(DEFAULT_OUTBOX_RETENTION > DEFAULT_CHANNEL_CAPACITY);
    }
}

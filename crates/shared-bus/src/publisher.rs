//! # Event Publisher
//!
//! Defines the publishing side of the bus and its in-memory implementation.

use crate::events::{EventFilter, LedgerEvent};
use crate::outbox::Outbox;
use crate::subscriber::{EventStream, Subscription};
use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_OUTBOX_RETENTION};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing notifications.
///
/// Publishing never fails: with no subscribers the event still lands in the
/// outbox.
pub trait EventPublisher: Send + Sync {
    /// Publish an event.
    ///
    /// # Returns
    ///
    /// The number of live subscribers that received the event.
    fn publish(&self, event: LedgerEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast` for multi-consumer fan-out and keeps a
/// bounded outbox for pull-based consumers. Subscriptions share the outbox
/// and replay from it after falling behind the channel.
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<LedgerEvent>,

    /// Retained events, oldest first.
    outbox: Arc<Outbox>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY, DEFAULT_OUTBOX_RETENTION)
    }

    /// Create a new in-memory event bus with specified channel capacity and
    /// outbox retention.
    #[must_use]
    pub fn with_capacity(capacity: usize, retention: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            outbox: Arc::new(Outbox::new(retention)),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events committed from now on that match a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        // The receiver and the starting index are taken together so an
        // event pushed concurrently is delivered exactly once.
        let (receiver, next_index) = self
            .outbox
            .at_head(|next| (self.sender.subscribe(), next));

        debug!(topics = ?filter.topics, from = next_index, "New subscription created");

        Subscription::new(receiver, filter, next_index, self.outbox.clone())
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    /// Retained events with `global_index >= from`, oldest first.
    #[must_use]
    pub fn events_since(&self, from: u64) -> Vec<LedgerEvent> {
        self.outbox.since(from)
    }

    /// Retained events matching `filter`.
    #[must_use]
    pub fn query(&self, filter: &EventFilter) -> Vec<LedgerEvent> {
        self.outbox.query(filter)
    }

    /// Number of retained events.
    #[must_use]
    pub fn outbox_len(&self) -> usize {
        self.outbox.len()
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, event: LedgerEvent) -> usize {
        let topic = event.topic();
        let index = event.global_index;

        self.events_published.fetch_add(1, Ordering::Relaxed);

        if let Some(evicted) = self.outbox.push(event.clone()) {
            warn!(
                evicted = evicted.global_index,
                retention = self.outbox.retention(),
                "Outbox retention reached, oldest event evicted"
            );
        }

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    topic = ?topic,
                    index,
                    receivers = receiver_count,
                    "Event published"
                );
                receiver_count
            }
            Err(_) => {
                // No live subscribers; the outbox still holds it.
                debug!(topic = ?topic, index, "Event retained (no subscribers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

//! # Event Subscriber
//!
//! Live delivery of committed events, in commit order and without gaps
//! while the outbox still holds what the broadcast channel dropped.
//!
//! A subscriber that falls more than the channel capacity behind gets a
//! `Lagged` signal from the channel. Instead of skipping ahead it replays
//! everything after its cursor from the outbox, then drops channel copies
//! it has already delivered. Only events evicted from the outbox before
//! the replay are lost, and that loss is logged.

use crate::events::{EventFilter, LedgerEvent};
use crate::outbox::Outbox;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Errors from subscription operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("Event bus closed")]
    Closed,
}

/// Delivery position shared by [`Subscription`] and [`EventStream`].
struct Cursor {
    filter: EventFilter,
    /// Global index of the next event this subscriber has not seen.
    next_index: u64,
    /// Events replayed from the outbox, not yet handed out.
    backlog: VecDeque<LedgerEvent>,
    outbox: Arc<Outbox>,
}

impl Cursor {
    /// Advance past `event`, yielding it if new and matching the filter.
    fn accept(&mut self, event: LedgerEvent) -> Option<LedgerEvent> {
        if event.global_index < self.next_index {
            return None;
        }
        self.next_index = event.global_index + 1;
        self.filter.matches(&event).then_some(event)
    }

    fn next_backlogged(&mut self) -> Option<LedgerEvent> {
        while let Some(event) = self.backlog.pop_front() {
            if let Some(event) = self.accept(event) {
                return Some(event);
            }
        }
        None
    }

    fn catch_up(&mut self, lagged: u64) {
        let replay = self.outbox.since(self.next_index);
        if let Some(first) = replay.first() {
            if first.global_index > self.next_index {
                warn!(
                    from = self.next_index,
                    missed = first.global_index - self.next_index,
                    "Subscriber fell behind the outbox, events lost"
                );
            }
        }
        debug!(
            lagged,
            replayed = replay.len(),
            "Subscriber lagged, replaying from outbox"
        );
        self.backlog.extend(replay);
    }
}

/// A subscription handle for receiving events.
pub struct Subscription {
    receiver: broadcast::Receiver<LedgerEvent>,
    cursor: Cursor,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<LedgerEvent>,
        filter: EventFilter,
        next_index: u64,
        outbox: Arc<Outbox>,
    ) -> Self {
        Self {
            receiver,
            cursor: Cursor {
                filter,
                next_index,
                backlog: VecDeque::new(),
                outbox,
            },
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// Returns `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        loop {
            if let Some(event) = self.cursor.next_backlogged() {
                return Some(event);
            }
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(event) = self.cursor.accept(event) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => self.cursor.catch_up(count),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive the next matching event if one is ready.
    pub fn try_recv(&mut self) -> Result<Option<LedgerEvent>, SubscriptionError> {
        loop {
            if let Some(event) = self.cursor.next_backlogged() {
                return Ok(Some(event));
            }
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(event) = self.cursor.accept(event) {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => self.cursor.catch_up(count),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    /// Global index of the next event not yet delivered.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor.next_index
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.cursor.filter
    }

    /// Consume the subscription as a [`Stream`].
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            cursor: self.cursor,
        }
    }
}

/// [`Subscription`] as a `tokio_stream::Stream`, with the same ordering
/// and catch-up behavior.
pub struct EventStream {
    inner: BroadcastStream<LedgerEvent>,
    cursor: Cursor,
}

impl EventStream {
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.cursor.filter
    }
}

impl Stream for EventStream {
    type Item = LedgerEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(event) = this.cursor.next_backlogged() {
                return Poll::Ready(Some(event));
            }
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if let Some(event) = this.cursor.accept(event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    this.cursor.catch_up(count);
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::fixtures::event;
    use crate::events::EventTopic;
    use crate::publisher::InMemoryEventBus;
    use crate::EventPublisher;
    use shared_types::Component;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    fn indices(events: &[LedgerEvent]) -> Vec<u64> {
        events.iter().map(|e| e.global_index).collect()
    }

    #[tokio::test]
    async fn test_subscription_recv() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        bus.publish(event(0, Component::Custody, 1));

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(received.global_index, 0);
        assert_eq!(sub.position(), 1);
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Marketplace]));

        bus.publish(event(0, Component::Custody, 1));
        bus.publish(event(1, Component::Marketplace, 1));

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(received.global_index, 1);
        assert_eq!(received.topic(), EventTopic::Marketplace);
    }

    #[test]
    fn test_subscription_starts_at_head() {
        let bus = InMemoryEventBus::new();
        bus.publish(event(0, Component::Custody, 1));
        bus.publish(event(1, Component::Custody, 1));

        let mut sub = bus.subscribe(EventFilter::all());
        assert_eq!(sub.position(), 2);
        assert!(matches!(sub.try_recv(), Ok(None)));

        bus.publish(event(2, Component::Identity, 1));
        assert_eq!(sub.try_recv().unwrap().unwrap().global_index, 2);
    }

    #[test]
    fn test_lagged_subscriber_replays_outbox() {
        let bus = InMemoryEventBus::with_capacity(2, 16);
        let mut sub = bus.subscribe(EventFilter::all());
        for i in 0..6 {
            bus.publish(event(i, Component::Custody, 1));
        }

        let mut seen = Vec::new();
        while let Some(event) = sub.try_recv().unwrap() {
            seen.push(event);
        }
        assert_eq!(indices(&seen), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_lag_beyond_retention_resumes_at_oldest_retained() {
        let bus = InMemoryEventBus::with_capacity(2, 3);
        let mut sub = bus.subscribe(EventFilter::all());
        for i in 0..6 {
            bus.publish(event(i, Component::Custody, 1));
        }

        let mut seen = Vec::new();
        while let Some(event) = sub.try_recv().unwrap() {
            seen.push(event);
        }
        assert_eq!(indices(&seen), vec![3, 4, 5]);
        assert_eq!(sub.position(), 6);
    }

    #[tokio::test]
    async fn test_stream_yields_filtered_events() {
        let bus = InMemoryEventBus::with_capacity(2, 16);
        let mut stream = bus.event_stream(EventFilter::topics(vec![EventTopic::Logistics]));
        assert_eq!(EventStream::filter(&stream).topics, vec![EventTopic::Logistics]);

        for i in 0..5 {
            let component = if i % 2 == 0 {
                Component::Logistics
            } else {
                Component::Custody
            };
            bus.publish(event(i, component, 1));
        }

        let mut seen = Vec::new();
        for _ in 0..3 {
            let next = timeout(Duration::from_millis(100), stream.next())
                .await
                .expect("timeout")
                .expect("event");
            seen.push(next);
        }
        assert_eq!(indices(&seen), vec![0, 2, 4]);
        assert!(timeout(Duration::from_millis(20), stream.next()).await.is_err());
    }

    #[tokio::test]
    async fn test_stream_ends_with_bus() {
        let bus = InMemoryEventBus::new();
        let mut stream = bus.event_stream(EventFilter::all());
        drop(bus);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_subscription_drop_cleanup() {
        let bus = InMemoryEventBus::new();
        {
            let _sub1 = bus.subscribe(EventFilter::all());
            let _sub2 = bus.subscribe(EventFilter::all());
            assert_eq!(bus.subscriber_count(), 2);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_closed_bus() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());
        drop(bus);
        assert_eq!(sub.try_recv(), Err(SubscriptionError::Closed));
        assert_eq!(SubscriptionError::Closed.to_string(), "Event bus closed");
    }
}

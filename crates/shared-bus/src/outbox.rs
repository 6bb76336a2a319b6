//! # Outbox
//!
//! Bounded window of the most recent events, oldest first. Shared between
//! the bus and its subscriptions so a lagging subscriber can replay what
//! its channel dropped.
//!
//! Events are pushed in `global_index` order; the provenance ledger
//! publishes under its store lock, which guarantees it.

use crate::events::{EventFilter, LedgerEvent};
use parking_lot::RwLock;
use std::collections::VecDeque;

pub(crate) struct Outbox {
    events: RwLock<VecDeque<LedgerEvent>>,
    retention: usize,
}

impl Outbox {
    pub(crate) fn new(retention: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            retention: retention.max(1),
        }
    }

    pub(crate) fn retention(&self) -> usize {
        self.retention
    }

    /// Append `event`, returning the evicted event once retention is reached.
    pub(crate) fn push(&self, event: LedgerEvent) -> Option<LedgerEvent> {
        let mut events = self.events.write();
        let evicted = if events.len() >= self.retention {
            events.pop_front()
        } else {
            None
        };
        events.push_back(event);
        evicted
    }

    /// Run `f` while no event can be pushed, passing the index the next
    /// pushed event is expected to carry.
    pub(crate) fn at_head<R>(&self, f: impl FnOnce(u64) -> R) -> R {
        let events = self.events.read();
        let next = events.back().map_or(0, |e| e.global_index + 1);
        f(next)
    }

    pub(crate) fn since(&self, from: u64) -> Vec<LedgerEvent> {
        let events = self.events.read();
        // Indices are ascending, so skip the prefix directly.
        let start = events.partition_point(|e| e.global_index < from);
        events.range(start..).cloned().collect()
    }

    pub(crate) fn query(&self, filter: &EventFilter) -> Vec<LedgerEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.read().len()
    }
}

//! Ports for the logistics tracker.

pub mod inbound;
pub mod outbound;

//! Ports for the marketplace.

pub mod inbound;
pub mod outbound;

//! Ports for the condition gateway.

pub mod inbound;
pub mod outbound;

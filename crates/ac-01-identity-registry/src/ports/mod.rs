//! Ports for the identity registry.

pub mod inbound;
pub mod outbound;

//! Ports for object references.

pub mod inbound;
pub mod outbound;

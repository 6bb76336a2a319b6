//! Ports for the provenance subsystem.

pub mod inbound;
pub mod outbound;

//! Ports for the custody ledger.

pub mod inbound;
pub mod outbound;

//! # Node Container
//!
//! Holds every subsystem instance and wires them together in dependency
//! order:
//!
//! ```text
//! Level 0: Event bus, clock
//! Level 1: Provenance ledger (publishes to the bus)
//! Level 2: Identity registry, condition gateway
//! Level 3: Custody ledger (directory + conditions)
//! Level 4: Marketplace, verification tokens, object references (goods)
//! Level 5: Logistics (goods + offer settlements)
//! ```

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::LedgerNode;

//! Adapters for the logistics tracker.

pub mod memory;

pub use memory::InMemoryShipmentStore;

//! Adapters for the provenance subsystem.

pub mod memory;

pub use memory::InMemoryEntryStore;

//! Adapters for the identity registry.

pub mod memory;

pub use memory::InMemoryActorStore;

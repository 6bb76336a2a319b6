//! Adapters for the custody ledger.

pub mod memory;

pub use memory::InMemoryGoodStore;

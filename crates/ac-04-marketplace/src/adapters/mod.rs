//! Adapters for the marketplace.

pub mod memory;

pub use memory::InMemoryMarketStore;

//! Adapters for object references.

pub mod memory;

pub use memory::InMemoryUploadStore;

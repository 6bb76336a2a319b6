//! Cross-subsystem integration scenarios.

pub mod harness;

mod custody;
mod events;
mod identity;
mod logistics;
mod marketplace;
mod properties;
mod provenance;

//! # ac-01-identity-registry
//!
//! Registers actors, assigns exactly one role per actor, tracks active and
//! blacklisted status, and keeps license identifiers unique.
//!
//! ## Overview
//!
//! - **Administrator-gated**: only an active administrator registers actors
//!   or changes their status; a bootstrap administrator is seeded at
//!   construction.
//! - **License uniqueness**: `license → actor` stays injective.
//! - **Governance guard**: no change may leave the system without an active,
//!   non-blacklisted administrator.
//! - **Directory**: implements [`ActorDirectory`](shared_types::ActorDirectory),
//!   the authorization source for every other subsystem.
//!
//! Every mutation appends one provenance entry scoped to the affected actor.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryActorStore;
pub use domain::{
    Actor, IdentityConfig, IdentityError, IdentityResult, NewActor, ProfileUpdate,
    RoleStatistics, StatusChange,
};
pub use ports::inbound::IdentityApi;
pub use ports::outbound::ActorStore;
pub use service::IdentityRegistry;

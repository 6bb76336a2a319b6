//! Domain layer for the identity registry.

pub mod config;
pub mod entities;
pub mod errors;

pub use config::IdentityConfig;
pub use entities::{Actor, NewActor, ProfileUpdate, RoleStatistics, StatusChange};
pub use errors::{IdentityError, IdentityResult};

//! # Shared Types Crate
//!
//! Identifiers, enumerations, the error taxonomy and the cross-subsystem
//! ports used by every Agri-Custody subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type crossing a subsystem boundary is
//!   defined here.
//! - **No Direct Coupling**: subsystems see each other only through the
//!   traits in [`ports`].
//! - **Typed Authorization**: permission checks in [`capability`] return a
//!   typed [`Denied`] rather than a boolean.

pub mod audit;
pub mod capability;
pub mod conditions;
pub mod entities;
pub mod errors;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use audit::*;
pub use conditions::*;
pub use entities::*;
pub use errors::*;
pub use ports::*;

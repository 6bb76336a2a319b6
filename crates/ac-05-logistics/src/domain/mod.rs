//! Domain layer for the logistics tracker.

pub mod config;
pub mod entities;
pub mod errors;
pub mod transitions;

pub use config::LogisticsConfig;
pub use entities::{Checkpoint, NewShipment, Shipment, ShipmentStatus, StatusUpdate};
pub use errors::{LogisticsError, LogisticsResult};
pub use transitions::authorize;

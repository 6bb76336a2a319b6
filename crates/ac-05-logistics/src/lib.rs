//! # ac-05-logistics
//!
//! Physical movement of a good between two parties.
//!
//! ```text
//! Created ──sender|carrier──→ PickedUp ──sender|carrier──→ InTransit
//!                                                              │
//!          Confirmed ←──receiver── Delivered ←──carrier|receiver┘
//! ```
//!
//! Without a carrier the sender delivers personally and may also mark the
//! shipment delivered. A shipment may reference an accepted offer, in which
//! case sender and receiver must be that offer's two parties.
//!
//! Confirming delivery returns a [`CustodyTransfer`](shared_types::CustodyTransfer);
//! this crate never touches custody itself.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryShipmentStore;
pub use domain::{
    authorize, Checkpoint, LogisticsConfig, LogisticsError, LogisticsResult, NewShipment,
    Shipment, ShipmentStatus, StatusUpdate,
};
pub use ports::inbound::LogisticsApi;
pub use ports::outbound::ShipmentStore;
pub use service::LogisticsTracker;

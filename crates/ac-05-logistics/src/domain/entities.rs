//! Domain entities for the logistics tracker.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, CustodyTransfer, GoodId, OfferId, ShipmentId, Timestamp};
use std::fmt;

/// ```text
/// Created → PickedUp → InTransit → Delivered → Confirmed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Created,
    PickedUp,
    InTransit,
    Delivered,
    Confirmed,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 5] = [
        ShipmentStatus::Created,
        ShipmentStatus::PickedUp,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Confirmed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShipmentStatus::Created => "created",
            ShipmentStatus::PickedUp => "picked_up",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Confirmed => "confirmed",
        }
    }

    pub fn next(self) -> Option<ShipmentStatus> {
        match self {
            ShipmentStatus::Created => Some(ShipmentStatus::PickedUp),
            ShipmentStatus::PickedUp => Some(ShipmentStatus::InTransit),
            ShipmentStatus::InTransit => Some(ShipmentStatus::Delivered),
            ShipmentStatus::Delivered => Some(ShipmentStatus::Confirmed),
            ShipmentStatus::Confirmed => None,
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a shipment's movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub status: ShipmentStatus,
    pub actor: ActorId,
    pub note: String,
    pub location: Option<String>,
    pub recorded_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub good_id: GoodId,
    pub offer_id: Option<OfferId>,
    pub sender: ActorId,
    pub receiver: ActorId,
    /// `None` means the sender delivers it personally.
    pub carrier: Option<ActorId>,
    pub tracking_code: String,
    pub origin: String,
    pub destination: String,
    pub metadata_ref: Option<String>,
    pub status: ShipmentStatus,
    pub created_at: Timestamp,
    pub picked_up_at: Option<Timestamp>,
    pub in_transit_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
    pub checkpoints: Vec<Checkpoint>,
}

impl Shipment {
    pub fn is_self_delivery(&self) -> bool {
        self.carrier.is_none()
    }

    /// Not yet confirmed.
    pub fn is_open(&self) -> bool {
        self.status != ShipmentStatus::Confirmed
    }

    pub fn involves(&self, actor: &ActorId) -> bool {
        self.sender == *actor || self.receiver == *actor || self.carrier == Some(*actor)
    }

    /// Record the time `status` was entered.
    pub fn stamp(&mut self, status: ShipmentStatus, now: Timestamp) {
        let slot = match status {
            ShipmentStatus::Created => return,
            ShipmentStatus::PickedUp => &mut self.picked_up_at,
            ShipmentStatus::InTransit => &mut self.in_transit_at,
            ShipmentStatus::Delivered => &mut self.delivered_at,
            ShipmentStatus::Confirmed => &mut self.confirmed_at,
        };
        *slot = Some(now);
        self.status = status;
    }

    /// The custody signal for a confirmed shipment.
    pub fn custody_transfer(&self) -> Option<CustodyTransfer> {
        let confirmed_at = self.confirmed_at?;
        Some(CustodyTransfer {
            shipment_id: self.id,
            good_id: self.good_id,
            sender: self.sender,
            receiver: self.receiver,
            confirmed_at,
        })
    }
}

/// Input to `create_shipment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub good_id: GoodId,
    pub offer_id: Option<OfferId>,
    pub receiver: ActorId,
    /// `None` or the zero address means self-delivery.
    pub carrier: Option<ActorId>,
    pub tracking_code: String,
    pub origin: String,
    pub destination: String,
    pub metadata_ref: Option<String>,
}

/// Note and location attached to a status change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    pub note: String,
    pub location: Option<String>,
}

impl StatusUpdate {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

//! # Inbound Ports (Driving Ports / API)

use crate::domain::{LogisticsResult, NewShipment, Shipment, ShipmentStatus, StatusUpdate};
use shared_types::{ActorId, CustodyTransfer, GoodId, ShipmentId};

/// Logistics tracker API.
pub trait LogisticsApi: Send + Sync {
    /// Caller must hold the good.
    fn create_shipment(&self, caller: ActorId, request: NewShipment) -> LogisticsResult<Shipment>;

    /// Move one step forward, gated by party. `Confirmed` is reached only
    /// through [`LogisticsApi::confirm_delivery`].
    fn advance_status(
        &self,
        caller: ActorId,
        shipment_id: ShipmentId,
        next: ShipmentStatus,
        update: StatusUpdate,
    ) -> LogisticsResult<Shipment>;

    /// Receiver only, from `Delivered`. The returned signal moves custody.
    fn confirm_delivery(
        &self,
        caller: ActorId,
        shipment_id: ShipmentId,
    ) -> LogisticsResult<CustodyTransfer>;

    /// Shipments the actor sends, receives or carries, optionally by status.
    fn shipments_for_actor(
        &self,
        actor: &ActorId,
        status: Option<ShipmentStatus>,
    ) -> Vec<Shipment>;

    fn shipment_detail(&self, shipment_id: ShipmentId) -> LogisticsResult<Shipment>;

    fn shipments_for_good(&self, good_id: GoodId) -> Vec<Shipment>;

    fn by_tracking_code(&self, code: &str) -> Option<Shipment>;
}

//! # Outbound Ports (Driven Ports)

use crate::domain::Shipment;
use shared_types::{GoodId, ShipmentId};

/// Shipment persistence.
///
/// Testing: `InMemoryShipmentStore` (adapters/memory.rs)
pub trait ShipmentStore: Send + Sync {
    fn next_id(&self) -> ShipmentId;

    fn get(&self, id: ShipmentId) -> Option<Shipment>;

    fn by_tracking_code(&self, code: &str) -> Option<ShipmentId>;

    /// Insert or replace by id. Tracking codes never change once stored.
    fn put(&mut self, shipment: Shipment);

    /// Shipments for `good_id`, oldest first.
    fn for_good(&self, good_id: GoodId) -> Vec<Shipment>;

    /// Every shipment, in id order.
    fn all(&self) -> Vec<Shipment>;
}

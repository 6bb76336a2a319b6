use crate::domain::Shipment;
use crate::ports::outbound::ShipmentStore;
use shared_types::{GoodId, ShipmentId};
use std::collections::{BTreeMap, HashMap};

/// In-memory shipment store for tests and single-process nodes.
#[derive(Debug, Default)]
pub struct InMemoryShipmentStore {
    shipments: BTreeMap<ShipmentId, Shipment>,
    tracking: HashMap<String, ShipmentId>,
    by_good: HashMap<GoodId, Vec<ShipmentId>>,
}

impl InMemoryShipmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShipmentStore for InMemoryShipmentStore {
    fn next_id(&self) -> ShipmentId {
        ShipmentId(self.shipments.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn get(&self, id: ShipmentId) -> Option<Shipment> {
        self.shipments.get(&id).cloned()
    }

    fn by_tracking_code(&self, code: &str) -> Option<ShipmentId> {
        self.tracking.get(code).copied()
    }

    fn put(&mut self, shipment: Shipment) {
        if !self.shipments.contains_key(&shipment.id) {
            self.by_good
                .entry(shipment.good_id)
                .or_default()
                .push(shipment.id);
            self.tracking
                .insert(shipment.tracking_code.clone(), shipment.id);
        }
        self.shipments.insert(shipment.id, shipment);
    }

    fn for_good(&self, good_id: GoodId) -> Vec<Shipment> {
        self.by_good
            .get(&good_id)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    fn all(&self) -> Vec<Shipment> {
        self.shipments.values().cloned().collect()
    }
}

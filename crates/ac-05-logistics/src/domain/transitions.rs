//! Who may move a shipment into each status.

use crate::domain::entities::{Shipment, ShipmentStatus};
use shared_types::{ActorId, Denied};

/// Check that `caller` may move `shipment` into `next`.
///
/// - `PickedUp`, `InTransit`: sender or carrier
/// - `Delivered`: carrier or receiver, or the sender when self-delivering
/// - `Confirmed`: receiver
pub fn authorize(shipment: &Shipment, next: ShipmentStatus, caller: &ActorId) -> Result<(), Denied> {
    let is_sender = shipment.sender == *caller;
    let is_receiver = shipment.receiver == *caller;
    let is_carrier = shipment.carrier == Some(*caller);

    let (allowed, party) = match next {
        ShipmentStatus::Created => (false, "nobody"),
        ShipmentStatus::PickedUp | ShipmentStatus::InTransit => {
            (is_sender || is_carrier, "sender or carrier")
        }
        ShipmentStatus::Delivered if shipment.is_self_delivery() => {
            (is_sender || is_receiver, "sender or receiver")
        }
        ShipmentStatus::Delivered => (is_carrier || is_receiver, "carrier or receiver"),
        ShipmentStatus::Confirmed => (is_receiver, "receiver"),
    };

    if allowed {
        Ok(())
    } else {
        Err(Denied::NotParty {
            actor: *caller,
            party,
        })
    }
}

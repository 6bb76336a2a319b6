//! # Trade Eligibility
//!
//! Who may sell or buy a good at its current stage. Sellers are always the
//! current holder; buyers hold the role that enters the next stage.

use crate::domain::entities::{OfferKind, Side};
use shared_types::{ActorStanding, GoodSummary, Role, Stage};

/// Role that may buy a good at `stage`, if any.
pub fn buyer_role(stage: Stage) -> Option<Role> {
    match stage {
        Stage::Origin => Some(Role::Processor),
        Stage::Processing => Some(Role::Distributor),
        Stage::Distribution => Some(Role::Retailer),
        Stage::Retail | Stage::Consumed | Stage::Deactivated => None,
    }
}

/// Whether a good at `stage` may be offered at all.
pub fn is_sellable(stage: Stage) -> bool {
    match stage {
        Stage::Origin | Stage::Processing | Stage::Distribution | Stage::Retail => true,
        Stage::Consumed | Stage::Deactivated => false,
    }
}

/// Whether `standing` may take `side` on `good`.
pub fn can_take(side: Side, good: &GoodSummary, standing: &ActorStanding) -> bool {
    match side {
        Side::Seller => is_sellable(good.stage) && good.holder == standing.actor,
        Side::Buyer => buyer_role(good.stage) == Some(standing.role) && good.holder != standing.actor,
    }
}

/// Side the creator takes by making an offer of `kind`, or `None` if not eligible.
pub fn creator_side(kind: OfferKind, good: &GoodSummary, standing: &ActorStanding) -> Option<Side> {
    let wanted: &[Side] = match kind {
        OfferKind::Sell => &[Side::Seller],
        OfferKind::Buy => &[Side::Buyer],
        OfferKind::Contract => &[Side::Seller, Side::Buyer],
    };
    wanted
        .iter()
        .copied()
        .find(|&side| can_take(side, good, standing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ActorId, GoodId};

    fn good(stage: Stage, holder: ActorId) -> GoodSummary {
        GoodSummary {
            id: GoodId(1),
            code: "G".into(),
            name: "g".into(),
            producer: ActorId::repeat(1),
            holder,
            stage,
            created_at: 0,
            stage_count: 1,
        }
    }

    fn standing(byte: u8, role: Role) -> ActorStanding {
        ActorStanding {
            actor: ActorId::repeat(byte),
            role,
            active: true,
            blacklisted: false,
        }
    }

    #[test]
    fn test_buyer_follows_stage() {
        assert_eq!(buyer_role(Stage::Origin), Some(Role::Processor));
        assert_eq!(buyer_role(Stage::Distribution), Some(Role::Retailer));
        assert_eq!(buyer_role(Stage::Retail), None);
    }

    #[test]
    fn test_sell_only_by_holder() {
        let farmer = standing(1, Role::Producer);
        let origin = good(Stage::Origin, farmer.actor);
        assert_eq!(creator_side(OfferKind::Sell, &origin, &farmer), Some(Side::Seller));
        let mill = standing(2, Role::Processor);
        assert_eq!(creator_side(OfferKind::Sell, &origin, &mill), None);
        let consumed = good(Stage::Consumed, farmer.actor);
        assert_eq!(creator_side(OfferKind::Sell, &consumed, &farmer), None);
    }

    #[test]
    fn test_buy_only_by_next_role() {
        let origin = good(Stage::Origin, ActorId::repeat(1));
        assert_eq!(
            creator_side(OfferKind::Buy, &origin, &standing(2, Role::Processor)),
            Some(Side::Buyer)
        );
        assert_eq!(creator_side(OfferKind::Buy, &origin, &standing(3, Role::Retailer)), None);
    }

    #[test]
    fn test_contract_either_side() {
        let farmer = standing(1, Role::Producer);
        let origin = good(Stage::Origin, farmer.actor);
        assert_eq!(creator_side(OfferKind::Contract, &origin, &farmer), Some(Side::Seller));
        assert_eq!(
            creator_side(OfferKind::Contract, &origin, &standing(2, Role::Processor)),
            Some(Side::Buyer)
        );
        assert_eq!(creator_side(OfferKind::Contract, &origin, &standing(4, Role::Carrier)), None);
    }
}

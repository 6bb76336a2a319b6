//! Domain entities for the marketplace.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, GoodId, OfferId, OfferSettlement, Stage, Timestamp};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferKind {
    Buy,
    Sell,
    /// Either party may propose.
    Contract,
}

impl OfferKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OfferKind::Buy => "buy",
            OfferKind::Sell => "sell",
            OfferKind::Contract => "contract",
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the trade an actor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Gives up custody: the current holder.
    Seller,
    /// Takes custody: the role that enters the next stage.
    Buyer,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Seller => Side::Buyer,
            Side::Buyer => Side::Seller,
        }
    }
}

/// Offer status. Leaves `Open` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferStatus {
    Open,
    Accepted,
    Expired,
    Cancelled,
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OfferStatus::Open => "open",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Expired => "expired",
            OfferStatus::Cancelled => "cancelled",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub creator: ActorId,
    pub creator_side: Side,
    /// Only this actor may accept, when set.
    pub counterparty: Option<ActorId>,
    pub good_id: GoodId,
    pub kind: OfferKind,
    /// Smallest currency unit.
    pub price: u64,
    pub quantity: u64,
    pub terms: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Good stage when the offer was made; acceptance requires it unchanged.
    pub stage_at_creation: Stage,
    pub status: OfferStatus,
    pub acceptor: Option<ActorId>,
    pub closed_at: Option<Timestamp>,
}

impl Offer {
    pub fn is_past_expiry(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Open and not yet past expiry.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.status == OfferStatus::Open && !self.is_past_expiry(now)
    }

    pub fn settlement(&self) -> OfferSettlement {
        OfferSettlement {
            offer_id: self.id,
            good_id: self.good_id,
            creator: self.creator,
            acceptor: self.acceptor,
            accepted: self.status == OfferStatus::Accepted,
        }
    }
}

/// Input to `create_offer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOffer {
    pub good_id: GoodId,
    pub kind: OfferKind,
    pub price: u64,
    pub quantity: u64,
    pub terms: String,
    /// Lifetime from now, in seconds.
    pub expiry_secs: u64,
    pub counterparty: Option<ActorId>,
}

/// Append-only analytics record, independent of any offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketTransaction {
    pub id: u64,
    pub good_id: GoodId,
    pub seller: ActorId,
    pub buyer: ActorId,
    pub price: u64,
    pub quantity: u64,
    pub tag: String,
    pub recorded_by: ActorId,
    pub recorded_at: Timestamp,
}

impl MarketTransaction {
    pub fn value(&self) -> u128 {
        u128::from(self.price) * u128::from(self.quantity)
    }
}

/// Input to `record_transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub good_id: GoodId,
    pub seller: ActorId,
    pub buyer: ActorId,
    pub price: u64,
    pub quantity: u64,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketStats {
    /// Open and not past expiry.
    pub open: usize,
    pub accepted: usize,
    /// Explicitly expired plus open offers already past expiry.
    pub expired: usize,
    pub cancelled: usize,
    pub transactions: usize,
    /// Sum of price × quantity over recorded transactions.
    pub volume: u128,
}

//! Error types for the marketplace.

use crate::domain::entities::{OfferKind, OfferStatus};
use shared_types::{
    ActorId, Classified, Denied, ErrorKind, GoodId, OfferId, ProvenanceFault, Stage, Timestamp,
};
use thiserror::Error;

/// Marketplace errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Good not found: {good_id}")]
    GoodNotFound { good_id: GoodId },

    #[error("Good {good_id} is {stage} and cannot be traded")]
    NotTradeable { good_id: GoodId, stage: Stage },

    /// Actor's role or custody does not allow this side of the trade.
    #[error("Actor {actor} may not take a {kind} offer on a good at {stage}")]
    Ineligible {
        actor: ActorId,
        kind: OfferKind,
        stage: Stage,
    },

    #[error("Offer not found: {offer_id}")]
    OfferNotFound { offer_id: OfferId },

    #[error("Offer {offer_id} is {status}")]
    NotOpen {
        offer_id: OfferId,
        status: OfferStatus,
    },

    #[error("Offer {offer_id} expired at {expires_at}")]
    Expired {
        offer_id: OfferId,
        expires_at: Timestamp,
    },

    #[error("Offer {offer_id} does not expire until {expires_at}")]
    NotYetExpired {
        offer_id: OfferId,
        expires_at: Timestamp,
    },

    #[error("Actor {actor} cannot accept its own offer {offer_id}")]
    OwnOffer { offer_id: OfferId, actor: ActorId },

    /// Good moved on since the offer was made.
    #[error("Offer {offer_id} was made at {recorded}, good is now {current}")]
    StageChanged {
        offer_id: OfferId,
        recorded: Stage,
        current: Stage,
    },

    #[error("Actor {actor} already has {cap} open offers")]
    OfferCapReached { actor: ActorId, cap: usize },

    #[error(transparent)]
    Denied(#[from] Denied),

    #[error(transparent)]
    Fault(#[from] ProvenanceFault),
}

impl Classified for MarketError {
    fn kind(&self) -> ErrorKind {
        match self {
            MarketError::InvalidInput { .. } => ErrorKind::Validation,
            MarketError::GoodNotFound { .. } | MarketError::OfferNotFound { .. } => {
                ErrorKind::NotFound
            }
            MarketError::NotTradeable { .. }
            | MarketError::NotOpen { .. }
            | MarketError::Expired { .. }
            | MarketError::NotYetExpired { .. }
            | MarketError::StageChanged { .. }
            | MarketError::OfferCapReached { .. } => ErrorKind::State,
            MarketError::Ineligible { .. } | MarketError::OwnOffer { .. } | MarketError::Denied(_) => {
                ErrorKind::Authorization
            }
            MarketError::Fault(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for marketplace operations.
pub type MarketResult<T> = Result<T, MarketError>;

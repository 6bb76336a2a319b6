//! Error types for the logistics tracker.

use crate::domain::entities::ShipmentStatus;
use shared_types::{
    Classified, Denied, ErrorKind, GoodId, OfferId, ProvenanceFault, ShipmentId, Stage,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogisticsError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Good not found: {good_id}")]
    GoodNotFound { good_id: GoodId },

    #[error("Good {good_id} is {stage} and cannot be shipped")]
    GoodNotShippable { good_id: GoodId, stage: Stage },

    #[error("Shipment not found: {shipment_id}")]
    ShipmentNotFound { shipment_id: ShipmentId },

    #[error("Tracking code {code} already used by {existing}")]
    DuplicateTrackingCode { code: String, existing: ShipmentId },

    #[error("Good {good_id} already has open {shipment_id}")]
    OpenShipmentExists {
        good_id: GoodId,
        shipment_id: ShipmentId,
    },

    #[error("Offer not found: {offer_id}")]
    OfferNotFound { offer_id: OfferId },

    #[error("Offer {offer_id} has not been accepted")]
    OfferNotSettled { offer_id: OfferId },

    #[error("Offer {offer_id} does not match shipment: {reason}")]
    OfferMismatch {
        offer_id: OfferId,
        reason: &'static str,
    },

    #[error("Invalid transition for {shipment_id}: {from} -> {to}")]
    InvalidTransition {
        shipment_id: ShipmentId,
        from: ShipmentStatus,
        to: ShipmentStatus,
    },

    #[error("Shipment {shipment_id} reached its checkpoint limit of {limit}")]
    CheckpointLimit {
        shipment_id: ShipmentId,
        limit: usize,
    },

    #[error(transparent)]
    Denied(#[from] Denied),

    #[error(transparent)]
    Fault(#[from] ProvenanceFault),
}

impl Classified for LogisticsError {
    fn kind(&self) -> ErrorKind {
        match self {
            LogisticsError::InvalidInput { .. } | LogisticsError::OfferMismatch { .. } => {
                ErrorKind::Validation
            }
            LogisticsError::GoodNotFound { .. }
            | LogisticsError::ShipmentNotFound { .. }
            | LogisticsError::OfferNotFound { .. } => ErrorKind::NotFound,
            LogisticsError::DuplicateTrackingCode { .. } => ErrorKind::Uniqueness,
            LogisticsError::GoodNotShippable { .. }
            | LogisticsError::OpenShipmentExists { .. }
            | LogisticsError::OfferNotSettled { .. }
            | LogisticsError::InvalidTransition { .. }
            | LogisticsError::CheckpointLimit { .. } => ErrorKind::State,
            LogisticsError::Denied(_) => ErrorKind::Authorization,
            LogisticsError::Fault(_) => ErrorKind::Fatal,
        }
    }
}

pub type LogisticsResult<T> = Result<T, LogisticsError>;

//! # Inbound Ports (Driving Ports / API)

use crate::domain::{
    Attestation, BatchEntry, CustodyResult, Good, NewGood, StageRecord, SupplyChainStats,
};
use shared_types::{ActorId, CustodyTransfer, GoodId, GoodSummary, Stage};

/// Custody ledger API.
pub trait CustodyApi: Send + Sync {
    /// Active producer only. Creates the Origin record.
    fn register(&self, caller: ActorId, request: NewGood) -> CustodyResult<Good>;

    /// The caller's role selects the target stage.
    fn advance(&self, caller: ActorId, good_id: GoodId, attestation: Attestation)
        -> CustodyResult<Good>;

    /// Anyone, once the good is at Retail.
    fn mark_consumed(&self, caller: ActorId, good_id: GoodId) -> CustodyResult<Good>;

    /// Originating producer only, while at Origin.
    fn deactivate(&self, caller: ActorId, good_id: GoodId) -> CustodyResult<Good>;

    /// Apply a confirmed delivery. Caller must be the receiver.
    fn apply_custody_transfer(
        &self,
        caller: ActorId,
        transfer: CustodyTransfer,
    ) -> CustodyResult<Good>;

    fn get_good(&self, id: GoodId) -> Option<Good>;

    fn get_by_code(&self, code: &str) -> Option<Good>;

    fn get_journey(&self, id: GoodId) -> CustodyResult<Vec<StageRecord>>;

    fn get_by_stage(&self, stage: Stage) -> Vec<GoodSummary>;

    fn goods_held_by(&self, actor: &ActorId) -> Vec<GoodSummary>;

    fn supply_chain_stats(&self) -> SupplyChainStats;

    /// One entry per requested id, placeholders where not viewable.
    fn get_batch(&self, caller: &ActorId, ids: &[GoodId]) -> Vec<BatchEntry>;

    /// Every good in id order, placeholders where not viewable.
    fn get_all_viewable(&self, caller: &ActorId) -> Vec<BatchEntry>;
}

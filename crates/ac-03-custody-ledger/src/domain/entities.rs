//! Domain entities for the custody ledger.

use crate::domain::alerts::Alert;
use serde::{Deserialize, Serialize};
use shared_types::{ActorId, ConditionSnapshot, GoodId, GoodSummary, Stage, Timestamp};

/// What an actor states when recording a stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attestation {
    pub text: String,
    /// Actor's price estimate for the good at this stage.
    pub price_estimate: Option<f64>,
    pub location: Option<String>,
}

impl Attestation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_estimate(mut self, estimate: f64) -> Self {
        self.price_estimate = Some(estimate);
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// One recorded stage. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub actor: ActorId,
    pub attestation: String,
    pub price_estimate: Option<f64>,
    pub location: Option<String>,
    pub recorded_at: Timestamp,
    pub conditions: ConditionSnapshot,
    pub alerts: Vec<Alert>,
}

/// A tracked good with its full journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Good {
    pub id: GoodId,
    pub code: String,
    pub name: String,
    pub producer: ActorId,
    pub holder: ActorId,
    pub stage: Stage,
    pub location: Option<String>,
    pub created_at: Timestamp,
    /// One record per stage entered, in order.
    pub records: Vec<StageRecord>,
}

impl Good {
    pub fn summary(&self) -> GoodSummary {
        GoodSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            producer: self.producer,
            holder: self.holder,
            stage: self.stage,
            created_at: self.created_at,
            stage_count: self.records.len(),
        }
    }

    /// Most recent price estimate on any stage record.
    pub fn last_price_estimate(&self) -> Option<f64> {
        self.records.iter().rev().find_map(|r| r.price_estimate)
    }

    /// Stages entered so far, in order.
    pub fn stage_path(&self) -> Vec<Stage> {
        self.records.iter().map(|r| r.stage).collect()
    }

    /// Producer, current holder or any actor that recorded a stage.
    pub fn involves(&self, actor: &ActorId) -> bool {
        self.producer == *actor
            || self.holder == *actor
            || self.records.iter().any(|r| r.actor == *actor)
    }
}

/// Input to `register`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGood {
    pub name: String,
    pub code: String,
    pub attestation: Attestation,
}

/// A bulk-query slot. Keeps positional correspondence with the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatchEntry {
    Visible(Good),
    /// Unknown id or caller not allowed to view it.
    Placeholder { id: GoodId },
}

impl BatchEntry {
    pub fn good(&self) -> Option<&Good> {
        match self {
            BatchEntry::Visible(good) => Some(good),
            BatchEntry::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, BatchEntry::Placeholder { .. })
    }
}

/// Count of goods per stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplyChainStats {
    pub total: usize,
    /// Not deactivated.
    pub active: usize,
    pub per_stage: Vec<(Stage, usize)>,
}

impl SupplyChainStats {
    pub fn count(&self, stage: Stage) -> usize {
        self.per_stage
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

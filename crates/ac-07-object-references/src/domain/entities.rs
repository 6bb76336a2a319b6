//! Domain entities for object references.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, GoodId, Hash, Stage, Timestamp, UploadRequestId};
use std::fmt;

/// What the off-chain object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Image,
    Certificate,
    LabReport,
    Invoice,
    Document,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Certificate => "certificate",
            FileKind::LabReport => "lab_report",
            FileKind::Invoice => "invoice",
            FileKind::Document => "document",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Pending` until the storage operator reports back, then final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Pending,
    Completed { reference: String },
    Failed { error: String },
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Completed { .. } => "completed",
            UploadStatus::Failed { .. } => "failed",
        }
    }
}

/// Result reported by the storage operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadOutcome {
    /// Stored; `reference` locates the object off-chain.
    Completed { reference: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub id: UploadRequestId,
    pub good_id: GoodId,
    pub requester: ActorId,
    /// SHA-256 of the object, committed before upload.
    pub content_hash: Hash,
    pub file_kind: FileKind,
    /// Stage the object documents.
    pub stage: Stage,
    pub status: UploadStatus,
    pub requested_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl UploadRequest {
    pub fn is_pending(&self) -> bool {
        self.status == UploadStatus::Pending
    }

    pub fn reference(&self) -> Option<&str> {
        match &self.status {
            UploadStatus::Completed { reference } => Some(reference),
            _ => None,
        }
    }

    pub fn content_hash_hex(&self) -> String {
        hex::encode(self.content_hash)
    }
}

/// Outcome of comparing a fetched object's hash with the committed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub request_id: UploadRequestId,
    pub completed: bool,
    pub hash_matches: bool,
    pub reference: Option<String>,
}

impl IntegrityReport {
    /// Upload completed and the object is unchanged.
    pub fn is_intact(&self) -> bool {
        self.completed && self.hash_matches
    }
}

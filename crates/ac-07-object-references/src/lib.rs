//! # ac-07-object-references
//!
//! Two-phase references from goods to off-chain objects such as lab
//! reports, certificates and photos.
//!
//! 1. The holder or producer commits the SHA-256 of the object with
//!    `request_upload`. The request starts `Pending`.
//! 2. A storage operator (configured, or any administrator) reports
//!    `Completed { reference }` or `Failed { error }`. Resolution is final.
//!
//! Anyone holding the object can later check it against the committed hash
//! with `verify_integrity`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryUploadStore;
pub use domain::{
    FileKind, IntegrityReport, ObjectConfig, ObjectError, ObjectResult, UploadOutcome,
    UploadRequest, UploadStatus,
};
pub use ports::inbound::ObjectReferenceApi;
pub use ports::outbound::UploadStore;
pub use service::ObjectReferences;

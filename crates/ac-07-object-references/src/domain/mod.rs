//! Domain layer for object references.

pub mod config;
pub mod entities;
pub mod errors;

pub use config::ObjectConfig;
pub use entities::{FileKind, IntegrityReport, UploadOutcome, UploadRequest, UploadStatus};
pub use errors::{ObjectError, ObjectResult};

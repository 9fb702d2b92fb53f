//! Error taxonomy for store and lifecycle operations.

use thiserror::Error;

/// Errors surfaced to the caller-facing layer.
///
/// Validation failures are rejected before any persistence attempt, so a
/// `Validation` error never leaves partial writes behind. Persistence and
/// serialisation faults are surfaced as-is and never retried here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("task {0} not found")]
    TaskNotFound(u64),

    #[error("project {0} not found")]
    ProjectNotFound(u64),

    #[error("storage error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("serialisation error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

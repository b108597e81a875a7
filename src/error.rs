//! Error types for u-allocate.
//!
//! Infeasible tasks are not errors; they end up in
//! [`Allocation::unassigned_task_ids`](crate::models::Allocation). Errors
//! cover malformed input and bad configuration only.

use thiserror::Error;

use crate::validation::ValidationError;

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum AllocError {
    /// One or more input records are malformed.
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// Strategy identifier not recognized.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Vec<ValidationError>> for AllocError {
    fn from(errors: Vec<ValidationError>) -> Self {
        AllocError::Validation(errors)
    }
}

/// Result type alias for u-allocate operations.
pub type Result<T> = std::result::Result<T, AllocError>;

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

//! Error types for the table pipeline

use thiserror::Error;

/// Errors that can occur at the edges of the table pipeline
///
/// Projection itself never fails; these cover rejected window parameters
/// and undecodable input documents.
#[derive(Debug, Error)]
pub enum TableError {
    /// Row cap must be at least one
    #[error("max rows must be a positive integer, got {0}")]
    InvalidMaxRows(usize),

    /// Timestamp could not be parsed as RFC 3339
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// JSON decoding failed
    #[error("invalid packet document: {0}")]
    Json(#[from] serde_json::Error),
}

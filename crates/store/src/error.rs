use thiserror::Error;

/// Storage-level failures surfaced to handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record named by the key does not exist.
    #[error("record not found")]
    NotFound,

    /// The write collides with an existing record (duplicate key or unique
    /// field).
    #[error("conflict: {0}")]
    Conflict(String),
}

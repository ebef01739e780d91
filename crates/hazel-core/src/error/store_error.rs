//! Errors raised at the storage boundary

use thiserror::Error;

/// Result type for [`TableStore`](crate::traits::TableStore) operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A primary key or unique constraint rejected the write
    #[error("unique constraint violated{}", .constraint.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    UniqueViolation { constraint: Option<String> },

    /// A stored value could not be read back in its column's shape
    #[error("failed to decode column {column}: {message}")]
    Decode { column: String, message: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

//! # Storage Errors

use std::time::Duration;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob and metadata storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    // Object errors
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Object already exists: {0}")]
    ObjectAlreadyExists(String),

    /// Compare-and-set lost: the record no longer points at the expected revision
    #[error("Revision conflict: {0}")]
    RevisionConflict(String),

    // Validation errors
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // Backend errors
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    IoError(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::ObjectNotFound(_) => 404,
            StorageError::ObjectAlreadyExists(_) => 409,
            StorageError::RevisionConflict(_) => 409,
            StorageError::InvalidKey(_) => 400,
            StorageError::Unavailable(_) => 503,
            StorageError::Timeout(_) => 503,
            StorageError::IoError(_) => 500,
            StorageError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StorageError::ObjectNotFound("test".into()).status_code(), 404);
        assert_eq!(StorageError::RevisionConflict("k".into()).status_code(), 409);
        assert_eq!(StorageError::Timeout(Duration::from_secs(3)).status_code(), 503);
    }
}

//! # Document Errors
//!
//! The error taxonomy callers of the document pipeline see.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document pipeline errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    // ==================
    // Rejected before any side effect
    // ==================
    /// Declared type is not on the allowlist
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Declared type does not match what the bytes are
    #[error("Content type mismatch: declared {declared}, detected {detected}")]
    ContentTypeMismatch { declared: String, detected: String },

    #[error("Document content is empty")]
    EmptyContent,

    #[error("Document too large: {0} bytes (max: {1})")]
    DocumentTooLarge(u64, u64),

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    // ==================
    // Scan gate
    // ==================
    /// Virus scan reported the content as infected
    #[error("Content rejected by virus scan")]
    ContentRejected,

    /// Scan could not be completed; uploads fail closed
    #[error("Virus scan unavailable: {0}")]
    ScanUnavailable(String),

    // ==================
    // Access
    // ==================
    /// Absent or expired
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Requester is not the owner
    #[error("Forbidden")]
    Forbidden,

    /// Custom id already holds a live document
    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    /// A concurrent write replaced the document first
    #[error("Conflicting concurrent update: {0}")]
    Conflict(String),

    // ==================
    // Server faults
    // ==================
    /// Stored ciphertext is damaged or no configured passphrase opens it
    #[error("Document {id} is corrupted: {reason}")]
    CorruptedDocument { id: String, reason: String },

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocumentError {
    /// HTTP status code for the transport layer
    pub fn status_code(&self) -> u16 {
        match self {
            DocumentError::EmptyContent => 400,
            DocumentError::InvalidId(_) => 400,
            DocumentError::InvalidExpiry(_) => 400,
            DocumentError::Forbidden => 403,
            DocumentError::NotFound(_) => 404,
            DocumentError::AlreadyExists(_) => 409,
            DocumentError::Conflict(_) => 409,
            DocumentError::DocumentTooLarge(_, _) => 413,
            DocumentError::UnsupportedContentType(_) => 415,
            DocumentError::ContentTypeMismatch { .. } => 415,
            DocumentError::ContentRejected => 422,
            DocumentError::CorruptedDocument { .. } => 500,
            DocumentError::EncryptionFailed => 500,
            DocumentError::Internal(_) => 500,
            DocumentError::ScanUnavailable(_) => 503,
            DocumentError::StorageUnavailable(_) => 503,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::UnsupportedContentType(_) => "DOCGATE_UNSUPPORTED_CONTENT_TYPE",
            DocumentError::ContentTypeMismatch { .. } => "DOCGATE_CONTENT_TYPE_MISMATCH",
            DocumentError::EmptyContent => "DOCGATE_EMPTY_CONTENT",
            DocumentError::DocumentTooLarge(_, _) => "DOCGATE_DOCUMENT_TOO_LARGE",
            DocumentError::InvalidId(_) => "DOCGATE_INVALID_ID",
            DocumentError::InvalidExpiry(_) => "DOCGATE_INVALID_EXPIRY",
            DocumentError::ContentRejected => "DOCGATE_CONTENT_REJECTED",
            DocumentError::ScanUnavailable(_) => "DOCGATE_SCAN_UNAVAILABLE",
            DocumentError::NotFound(_) => "DOCGATE_NOT_FOUND",
            DocumentError::Forbidden => "DOCGATE_FORBIDDEN",
            DocumentError::AlreadyExists(_) => "DOCGATE_ALREADY_EXISTS",
            DocumentError::Conflict(_) => "DOCGATE_CONFLICT",
            DocumentError::CorruptedDocument { .. } => "DOCGATE_CORRUPTED_DOCUMENT",
            DocumentError::EncryptionFailed => "DOCGATE_ENCRYPTION_FAILED",
            DocumentError::StorageUnavailable(_) => "DOCGATE_STORAGE_UNAVAILABLE",
            DocumentError::Internal(_) => "DOCGATE_INTERNAL",
        }
    }

    /// Whether the caller caused this error (logged at warn, not error)
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<StorageError> for DocumentError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::ObjectNotFound(key) => DocumentError::NotFound(key),
            StorageError::ObjectAlreadyExists(key) => DocumentError::AlreadyExists(key),
            StorageError::RevisionConflict(key) => DocumentError::Conflict(key),
            StorageError::Unavailable(msg) | StorageError::IoError(msg) => {
                DocumentError::StorageUnavailable(msg)
            }
            StorageError::Timeout(d) => {
                DocumentError::StorageUnavailable(format!("timed out after {:?}", d))
            }
            other => DocumentError::Internal(other.to_string()),
        }
    }
}

//! Observable events for docgate
//!
//! Every line the document pipeline logs names one of these events.

use std::fmt;

use super::logger::Severity;

/// Observable events in the document lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Gateway wired and ready
    GatewayReady,

    // Upload
    /// Document persisted
    DocumentUploaded,
    /// Upload rejected before anything was persisted
    UploadRejected,
    /// Scan provider failed or timed out; upload refused
    ScanUnavailable,
    /// Caller-supplied expiry ignored because policy forbids it
    CallerExpiryIgnored,
    /// Document content replaced with a new version
    DocumentUpdated,

    // Read
    /// Document returned to its owner
    DocumentDownloaded,
    /// Requester is not the owner
    AccessDenied,
    /// Stored ciphertext failed its checksum or no key could open it
    DocumentCorrupted,
    /// A legacy passphrase was needed to decrypt
    LegacyKeyDecrypt,
    /// Metadata points at a blob the store does not have
    DanglingMetadata,

    // Removal and maintenance
    /// Document deleted by its owner
    DocumentDeleted,
    /// Expired document physically removed
    ExpiredPurged,
    /// Document moved from a legacy key to the current key
    DocumentReencrypted,
    /// A blob could not be cleaned up after a failed or superseded write
    OrphanBlob,
    /// An expired document could not be purged; kept for the next run
    PurgeFailed,

    // Storage
    /// Storage backend failed its readiness probe
    StorageUnhealthy,
    /// Storage call failed or timed out
    StorageUnavailable,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::GatewayReady => "GATEWAY_READY",

            Event::DocumentUploaded => "DOCUMENT_UPLOADED",
            Event::UploadRejected => "UPLOAD_REJECTED",
            Event::ScanUnavailable => "SCAN_UNAVAILABLE",
            Event::CallerExpiryIgnored => "CALLER_EXPIRY_IGNORED",
            Event::DocumentUpdated => "DOCUMENT_UPDATED",

            Event::DocumentDownloaded => "DOCUMENT_DOWNLOADED",
            Event::AccessDenied => "ACCESS_DENIED",
            Event::DocumentCorrupted => "DOCUMENT_CORRUPTED",
            Event::LegacyKeyDecrypt => "LEGACY_KEY_DECRYPT",
            Event::DanglingMetadata => "DANGLING_METADATA",

            Event::DocumentDeleted => "DOCUMENT_DELETED",
            Event::ExpiredPurged => "EXPIRED_PURGED",
            Event::DocumentReencrypted => "DOCUMENT_REENCRYPTED",
            Event::OrphanBlob => "ORPHAN_BLOB",
            Event::PurgeFailed => "PURGE_FAILED",

            Event::StorageUnhealthy => "STORAGE_UNHEALTHY",
            Event::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DocumentCorrupted
            | Event::ScanUnavailable
            | Event::StorageUnhealthy
            | Event::StorageUnavailable => Severity::Error,
            Event::UploadRejected
            | Event::AccessDenied
            | Event::CallerExpiryIgnored
            | Event::LegacyKeyDecrypt
            | Event::DanglingMetadata
            | Event::OrphanBlob
            | Event::PurgeFailed => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

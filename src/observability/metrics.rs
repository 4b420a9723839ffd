//! Metrics registry for docgate
//!
//! - Counters only
//! - Monotonic increase, reset only on process start
//! - Lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry containing the document pipeline counters
///
/// All counters use Relaxed ordering; values are exact but not a consistent cut.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    uploads: AtomicU64,
    uploaded_bytes: AtomicU64,
    rejected_content_type: AtomicU64,
    rejected_virus: AtomicU64,
    rejected_other: AtomicU64,
    scan_unavailable: AtomicU64,
    updates: AtomicU64,
    downloads: AtomicU64,
    access_denied: AtomicU64,
    corrupted_documents: AtomicU64,
    legacy_key_decrypts: AtomicU64,
    deletes: AtomicU64,
    purged: AtomicU64,
    reencrypted: AtomicU64,
    storage_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful upload of `bytes` plaintext bytes
    pub fn record_upload(&self, bytes: u64) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        self.uploaded_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_rejected_content_type(&self) {
        self.rejected_content_type.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected_virus(&self) {
        self.rejected_virus.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected_other(&self) {
        self.rejected_other.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scan_unavailable(&self) {
        self.scan_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updates(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_downloads(&self) {
        self.downloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_access_denied(&self) {
        self.access_denied.fetch_add(1, Ordering::Relaxed);
    }

    /// Corruption is counted apart from every user-facing error
    pub fn increment_corrupted(&self) {
        self.corrupted_documents.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_legacy_key_decrypts(&self) {
        self.legacy_key_decrypts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_purged(&self, count: u64) {
        self.purged.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_reencrypted(&self) {
        self.reencrypted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads: self.uploads.load(Ordering::Relaxed),
            uploaded_bytes: self.uploaded_bytes.load(Ordering::Relaxed),
            rejected_content_type: self.rejected_content_type.load(Ordering::Relaxed),
            rejected_virus: self.rejected_virus.load(Ordering::Relaxed),
            rejected_other: self.rejected_other.load(Ordering::Relaxed),
            scan_unavailable: self.scan_unavailable.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            downloads: self.downloads.load(Ordering::Relaxed),
            access_denied: self.access_denied.load(Ordering::Relaxed),
            corrupted_documents: self.corrupted_documents.load(Ordering::Relaxed),
            legacy_key_decrypts: self.legacy_key_decrypts.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            purged: self.purged.load(Ordering::Relaxed),
            reencrypted: self.reencrypted.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uploads: u64,
    pub uploaded_bytes: u64,
    pub rejected_content_type: u64,
    pub rejected_virus: u64,
    pub rejected_other: u64,
    pub scan_unavailable: u64,
    pub updates: u64,
    pub downloads: u64,
    pub access_denied: u64,
    pub corrupted_documents: u64,
    pub legacy_key_decrypts: u64,
    pub deletes: u64,
    pub purged: u64,
    pub reencrypted: u64,
    pub storage_failures: u64,
}

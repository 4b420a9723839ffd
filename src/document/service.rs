//! # Document Service
//!
//! Orchestrates the upload pipeline and owner-scoped reads.
//!
//! ## Upload
//! `Validating → Scanning → Encrypting → Persisting → Done`. Nothing is written before
//! Persisting; once Persisting starts it runs to completion in its own task.
//!
//! ## Invariants
//! - Only the owner reads, updates or deletes a document
//! - Expired documents are absent to every read
//! - Storage only ever receives ciphertext
//! - Every write goes to a fresh blob key; metadata swaps are compare-and-set

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

use super::errors::{DocumentError, DocumentResult};
use super::metadata::{MetadataStore, Precondition};
use super::model::{
    Document, DocumentId, DocumentRecord, DownloadedDocument, NewDocument, UploadStage,
};
use crate::content_type::{normalize, ContentTypeService};
use crate::crypto::{Cryptography, Decrypted, KeySlot};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::owner::OwnerId;
use crate::scan::ScanGate;
use crate::storage::{Storage, StorageError, StorageKey, StorageResult};

/// How many concurrent revision swaps a read follows before giving up
const MAX_REVISION_FOLLOWS: usize = 2;

/// Default upper bound on a single document
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Immutable service policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    /// Honour caller-supplied expiry on custom-id uploads
    pub allow_caller_expiry: bool,
    /// Applied when no usable caller expiry is given
    pub default_ttl: Option<chrono::Duration>,
    /// Bound on every storage call
    pub storage_timeout: Duration,
    pub max_document_bytes: u64,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            allow_caller_expiry: false,
            default_ttl: None,
            storage_timeout: Duration::from_secs(30),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// Validated, scanned and sealed content ready to persist
struct SealedContent {
    declared: String,
    detected: String,
    size: u64,
    ciphertext: Vec<u8>,
    checksum: String,
}

async fn with_timeout<T, F>(timeout: Duration, operation: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(timeout)),
    }
}

/// Metadata stores do synchronous I/O; keep it off the async workers
async fn on_blocking_pool<T, F>(metadata: &Arc<dyn MetadataStore>, call: F) -> StorageResult<T>
where
    F: FnOnce(&dyn MetadataStore) -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    let metadata = Arc::clone(metadata);
    tokio::task::spawn_blocking(move || call(metadata.as_ref()))
        .await
        .map_err(|e| StorageError::Internal(format!("metadata task failed: {}", e)))?
}

/// Document gateway core
pub struct DocumentService {
    policy: DocumentPolicy,
    crypto: Arc<Cryptography>,
    content_types: Arc<ContentTypeService>,
    scan: ScanGate,
    storage: Arc<dyn Storage>,
    metadata: Arc<dyn MetadataStore>,
    metrics: Arc<MetricsRegistry>,
}

impl DocumentService {
    pub fn new(
        policy: DocumentPolicy,
        crypto: Arc<Cryptography>,
        content_types: Arc<ContentTypeService>,
        scan: ScanGate,
        storage: Arc<dyn Storage>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            policy,
            crypto,
            content_types,
            scan,
            storage,
            metadata,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Share a registry with other components
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn policy(&self) -> &DocumentPolicy {
        &self.policy
    }

    // ==================
    // Upload
    // ==================

    /// Store a new document under a generated id
    pub async fn upload(&self, owner: &OwnerId, document: NewDocument) -> DocumentResult<Document> {
        let id = DocumentId::generate();
        let now = Utc::now();
        let expires_at = self
            .default_expiry(now)
            .map_err(|e| self.rejected(UploadStage::Validating, &id, e))?;

        let sealed = self.seal(&id, &document).await?;
        let record = self.new_record(id, owner, document.title, sealed.meta(), now, expires_at, false)?;

        self.persist(&record, sealed.ciphertext, Precondition::Absent)
            .await
            .map_err(|e| self.rejected(UploadStage::Persisting, &record.id, e))?;

        Ok(self.uploaded(&record))
    }

    /// Store a new document under a caller-chosen id.
    ///
    /// Fails with `AlreadyExists` while a live document holds the id. An expired
    /// document under the id is replaced.
    pub async fn upload_with_custom_id(
        &self,
        owner: &OwnerId,
        id: DocumentId,
        document: NewDocument,
        expires_at: Option<DateTime<Utc>>,
    ) -> DocumentResult<Document> {
        let now = Utc::now();
        let expires_at = self
            .resolve_custom_expiry(&id, expires_at, now)
            .map_err(|e| self.rejected(UploadStage::Validating, &id, e))?;

        let (precondition, replaced) = match self.fetch_record(&id).await? {
            Some(existing) if !existing.is_expired(now) => {
                let err = DocumentError::AlreadyExists(id.to_string());
                return Err(self.rejected(UploadStage::Validating, &id, err));
            }
            Some(expired) => (
                Precondition::Revision(expired.blob_key.clone()),
                Some(expired.blob_key),
            ),
            None => (Precondition::Absent, None),
        };

        let sealed = self.seal(&id, &document).await?;
        let record = self.new_record(id, owner, document.title, sealed.meta(), now, expires_at, true)?;

        // Losing the race for a custom id reads as "taken", whichever precondition lost
        self.persist(&record, sealed.ciphertext, precondition)
            .await
            .map_err(|e| match e {
                DocumentError::Conflict(id) => DocumentError::AlreadyExists(id),
                other => other,
            })
            .map_err(|e| self.rejected(UploadStage::Persisting, &record.id, e))?;

        if let Some(old_blob) = replaced {
            self.discard_blob(&record.id, &old_blob).await;
        }

        Ok(self.uploaded(&record))
    }

    /// Replace the content of an existing document with a new version
    pub async fn update_content(
        &self,
        requester: &OwnerId,
        id: &DocumentId,
        document: NewDocument,
    ) -> DocumentResult<Document> {
        let now = Utc::now();
        let current = self.live_record(id, now).await?;
        self.authorize(requester, &current, "update")?;

        let sealed = self.seal(id, &document).await?;
        let meta = sealed.meta();

        let mut record = current.clone();
        record.blob_key = id.new_blob_key().map_err(DocumentError::from)?;
        record.title = document.title.or(current.title.clone());
        record.declared_content_type = meta.declared;
        record.detected_content_type = meta.detected;
        record.size = meta.size;
        record.checksum = meta.checksum;
        record.version = current.version + 1;
        record.updated_at = now;

        self.persist(
            &record,
            sealed.ciphertext,
            Precondition::Revision(current.blob_key.clone()),
        )
        .await
        .map_err(|e| self.rejected(UploadStage::Persisting, id, e))?;

        self.discard_blob(id, &current.blob_key).await;

        self.metrics.increment_updates();
        let version = record.version.to_string();
        log_event_with_fields(
            Event::DocumentUpdated,
            &[
                ("document_id", id.as_str()),
                ("owner", &record.owner.fingerprint()),
                ("version", &version),
            ],
        );

        Ok(record.descriptor())
    }

    // ==================
    // Read / delete
    // ==================

    /// Fetch and decrypt a document for its owner
    pub async fn download(
        &self,
        requester: &OwnerId,
        id: &DocumentId,
    ) -> DocumentResult<DownloadedDocument> {
        let record = self.live_record(id, Utc::now()).await?;
        self.authorize(requester, &record, "download")?;

        let (record, decrypted) = self.open(record).await?;

        self.metrics.increment_downloads();
        log_event_with_fields(
            Event::DocumentDownloaded,
            &[
                ("document_id", id.as_str()),
                ("owner", &record.owner.fingerprint()),
            ],
        );

        Ok(DownloadedDocument {
            content_type: record.detected_content_type.clone(),
            document: record.descriptor(),
            content: decrypted.plaintext,
        })
    }

    /// Delete a document. `Ok(false)` when there was nothing to delete.
    pub async fn delete(&self, requester: &OwnerId, id: &DocumentId) -> DocumentResult<bool> {
        let record = match self.fetch_record(id).await? {
            None => return Ok(false),
            Some(record) if record.is_expired(Utc::now()) => {
                return Err(DocumentError::NotFound(id.to_string()))
            }
            Some(record) => record,
        };
        self.authorize(requester, &record, "delete")?;

        with_timeout(self.policy.storage_timeout, self.storage.delete(&record.blob_key))
            .await
            .map_err(|e| self.storage_failure("delete", e))?;

        match self.remove_record(id, &record.blob_key).await {
            Ok(_) => {}
            Err(StorageError::ObjectNotFound(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        self.metrics.increment_deletes();
        log_event_with_fields(
            Event::DocumentDeleted,
            &[
                ("document_id", id.as_str()),
                ("owner", &record.owner.fingerprint()),
            ],
        );

        Ok(true)
    }

    /// The requester's live documents, ordered by id
    pub fn list(&self, requester: &OwnerId) -> DocumentResult<Vec<Document>> {
        let now = Utc::now();
        let mut documents: Vec<Document> = self
            .metadata
            .list_by_owner(requester)?
            .into_iter()
            .filter(|r| !r.is_expired(now))
            .map(|r| r.descriptor())
            .collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    // ==================
    // Maintenance
    // ==================

    /// Move a document sealed under a legacy passphrase to the current one.
    ///
    /// Returns whether anything was rewritten. Version and timestamps are kept.
    pub async fn reencrypt(&self, id: &DocumentId) -> DocumentResult<bool> {
        let current = self.live_record(id, Utc::now()).await?;
        let (current, decrypted) = self.open(current).await?;

        let slot = match decrypted.slot {
            KeySlot::Current => return Ok(false),
            KeySlot::Legacy(slot) => slot,
        };

        let ciphertext = self
            .crypto
            .encrypt(&decrypted.plaintext)
            .map_err(|_| DocumentError::EncryptionFailed)?;

        let mut record = current.clone();
        record.blob_key = id.new_blob_key().map_err(DocumentError::from)?;
        record.checksum = DocumentRecord::calculate_checksum(&ciphertext);

        self.persist(
            &record,
            ciphertext,
            Precondition::Revision(current.blob_key.clone()),
        )
        .await?;
        self.discard_blob(id, &current.blob_key).await;

        self.metrics.increment_reencrypted();
        let slot = slot.to_string();
        log_event_with_fields(
            Event::DocumentReencrypted,
            &[("document_id", id.as_str()), ("legacy_slot", &slot)],
        );

        Ok(true)
    }

    /// Physically remove every expired document. Returns how many went.
    ///
    /// A record whose blob cannot be deleted is kept and retried on the next run.
    pub async fn purge_expired(&self) -> DocumentResult<usize> {
        let now = Utc::now();
        let expired = on_blocking_pool(&self.metadata, move |m| m.list_expired(now)).await?;
        let mut purged = 0usize;

        for record in expired {
            if let Err(e) =
                with_timeout(self.policy.storage_timeout, self.storage.delete(&record.blob_key))
                    .await
            {
                let error = self.storage_failure("delete", e).to_string();
                log_event_with_fields(
                    Event::PurgeFailed,
                    &[
                        ("blob_key", record.blob_key.as_str()),
                        ("document_id", record.id.as_str()),
                        ("error", &error),
                    ],
                );
                continue;
            }

            match self.remove_record(&record.id, &record.blob_key).await {
                Ok(_) => purged += 1,
                // Replaced or removed since listing
                Err(StorageError::RevisionConflict(_)) | Err(StorageError::ObjectNotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        // Writes older than twice the storage timeout were abandoned by their caller
        let grace = self.policy.storage_timeout * 2;
        let swept = match with_timeout(self.policy.storage_timeout, self.storage.sweep_staging(grace))
            .await
        {
            Ok(swept) => swept,
            Err(e) => {
                self.storage_failure("sweep", e);
                0
            }
        };

        self.metrics.add_purged(purged as u64);
        let (count, swept) = (purged.to_string(), swept.to_string());
        log_event_with_fields(
            Event::ExpiredPurged,
            &[("count", &count), ("staging_swept", &swept)],
        );

        Ok(purged)
    }

    // ==================
    // Pipeline stages
    // ==================

    /// Validating → Scanning → Encrypting
    async fn seal(&self, id: &DocumentId, document: &NewDocument) -> DocumentResult<SealedContent> {
        let (declared, detected) = self
            .validate(document)
            .map_err(|e| self.rejected(UploadStage::Validating, id, e))?;

        self.scan
            .check(&document.content)
            .await
            .map_err(|e| self.rejected(UploadStage::Scanning, id, e))?;

        let ciphertext = self
            .crypto
            .encrypt(&document.content)
            .map_err(|_| self.rejected(UploadStage::Encrypting, id, DocumentError::EncryptionFailed))?;

        Ok(SealedContent {
            declared,
            detected,
            size: document.content.len() as u64,
            checksum: DocumentRecord::calculate_checksum(&ciphertext),
            ciphertext,
        })
    }

    fn validate(&self, document: &NewDocument) -> DocumentResult<(String, String)> {
        if document.content.is_empty() {
            return Err(DocumentError::EmptyContent);
        }

        let size = document.content.len() as u64;
        if size > self.policy.max_document_bytes {
            return Err(DocumentError::DocumentTooLarge(
                size,
                self.policy.max_document_bytes,
            ));
        }

        let detected = self
            .content_types
            .check(&document.content_type, &document.content)?;
        Ok((normalize(&document.content_type), detected))
    }

    fn resolve_custom_expiry(
        &self,
        id: &DocumentId,
        requested: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DocumentResult<Option<DateTime<Utc>>> {
        let default = self.default_expiry(now)?;

        match requested {
            None => Ok(default),
            Some(at) if !self.policy.allow_caller_expiry => {
                let requested = at.to_rfc3339();
                log_event_with_fields(
                    Event::CallerExpiryIgnored,
                    &[("document_id", id.as_str()), ("requested", &requested)],
                );
                Ok(default)
            }
            Some(at) if at <= now => Err(DocumentError::InvalidExpiry(format!(
                "{} is not in the future",
                at.to_rfc3339()
            ))),
            Some(at) => Ok(Some(at)),
        }
    }

    fn default_expiry(&self, now: DateTime<Utc>) -> DocumentResult<Option<DateTime<Utc>>> {
        match self.policy.default_ttl {
            None => Ok(None),
            Some(ttl) => now.checked_add_signed(ttl).map(Some).ok_or_else(|| {
                DocumentError::InvalidExpiry(format!("default ttl of {} overflows", ttl))
            }),
        }
    }

    /// Persisting: blob first, then the metadata compare-and-set.
    ///
    /// Runs in a spawned task; the caller's cancellation cannot split the two writes.
    async fn persist(
        &self,
        record: &DocumentRecord,
        ciphertext: Vec<u8>,
        precondition: Precondition,
    ) -> DocumentResult<()> {
        let storage = Arc::clone(&self.storage);
        let metadata = Arc::clone(&self.metadata);
        let timeout = self.policy.storage_timeout;
        let record = record.clone();

        let task = tokio::spawn(async move {
            with_timeout(timeout, storage.put(&record.blob_key, ciphertext)).await?;

            let committed = {
                let record = record.clone();
                on_blocking_pool(&metadata, move |m| m.put(&record, precondition)).await
            };

            if let Err(commit_error) = committed {
                if let Err(cleanup) = with_timeout(timeout, storage.delete(&record.blob_key)).await
                {
                    let cleanup = cleanup.to_string();
                    log_event_with_fields(
                        Event::OrphanBlob,
                        &[
                            ("blob_key", record.blob_key.as_str()),
                            ("document_id", record.id.as_str()),
                            ("error", &cleanup),
                        ],
                    );
                }
                return Err(commit_error);
            }

            Ok(())
        });

        match task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(self.storage_failure("put", e)),
            Err(e) => Err(DocumentError::Internal(format!("persist task failed: {}", e))),
        }
    }

    // ==================
    // Helpers
    // ==================

    #[allow(clippy::too_many_arguments)]
    fn new_record(
        &self,
        id: DocumentId,
        owner: &OwnerId,
        title: Option<String>,
        meta: ContentMeta,
        now: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        custom_id: bool,
    ) -> DocumentResult<DocumentRecord> {
        Ok(DocumentRecord {
            blob_key: id.new_blob_key().map_err(DocumentError::from)?,
            id,
            owner: owner.clone(),
            title,
            declared_content_type: meta.declared,
            detected_content_type: meta.detected,
            size: meta.size,
            checksum: meta.checksum,
            version: 1,
            custom_id,
            created_at: now,
            updated_at: now,
            expires_at,
        })
    }

    fn uploaded(&self, record: &DocumentRecord) -> Document {
        self.metrics.record_upload(record.size);
        let size = record.size.to_string();
        log_event_with_fields(
            Event::DocumentUploaded,
            &[
                ("content_type", &record.detected_content_type),
                ("document_id", record.id.as_str()),
                ("owner", &record.owner.fingerprint()),
                ("size", &size),
            ],
        );
        record.descriptor()
    }

    async fn fetch_record(&self, id: &DocumentId) -> StorageResult<Option<DocumentRecord>> {
        let id = id.clone();
        on_blocking_pool(&self.metadata, move |m| m.get(&id)).await
    }

    async fn remove_record(
        &self,
        id: &DocumentId,
        revision: &StorageKey,
    ) -> StorageResult<DocumentRecord> {
        let (id, revision) = (id.clone(), revision.clone());
        on_blocking_pool(&self.metadata, move |m| m.remove(&id, &revision)).await
    }

    /// Live record or `NotFound`
    async fn live_record(
        &self,
        id: &DocumentId,
        now: DateTime<Utc>,
    ) -> DocumentResult<DocumentRecord> {
        match self.fetch_record(id).await? {
            Some(record) if !record.is_expired(now) => Ok(record),
            _ => Err(DocumentError::NotFound(id.to_string())),
        }
    }

    fn authorize(
        &self,
        requester: &OwnerId,
        record: &DocumentRecord,
        operation: &str,
    ) -> DocumentResult<()> {
        if record.is_owned_by(requester) {
            return Ok(());
        }

        self.metrics.increment_access_denied();
        log_event_with_fields(
            Event::AccessDenied,
            &[
                ("document_id", record.id.as_str()),
                ("operation", operation),
                ("requester", &requester.fingerprint()),
            ],
        );
        Err(DocumentError::Forbidden)
    }

    /// Fetch the blob, verify its checksum, decrypt.
    ///
    /// A blob that vanished because a concurrent write swapped the record is
    /// followed to the newer revision. Returns the record that was opened.
    async fn open(&self, record: DocumentRecord) -> DocumentResult<(DocumentRecord, Decrypted)> {
        let mut record = record;
        let mut followed = 0;

        let ciphertext = loop {
            match with_timeout(
                self.policy.storage_timeout,
                self.storage.get(&record.blob_key),
            )
            .await
            {
                Ok(bytes) => break bytes,
                Err(StorageError::ObjectNotFound(_)) => {}
                Err(e) => return Err(self.storage_failure("get", e)),
            }

            let latest = self.fetch_record(&record.id).await?;
            match latest {
                Some(newer)
                    if newer.blob_key != record.blob_key
                        && newer.owner == record.owner
                        && !newer.is_expired(Utc::now()) =>
                {
                    if followed == MAX_REVISION_FOLLOWS {
                        return Err(DocumentError::Conflict(record.id.to_string()));
                    }
                    followed += 1;
                    record = newer;
                }
                Some(same) if same.blob_key == record.blob_key => {
                    log_event_with_fields(
                        Event::DanglingMetadata,
                        &[
                            ("blob_key", record.blob_key.as_str()),
                            ("document_id", record.id.as_str()),
                        ],
                    );
                    return Err(DocumentError::NotFound(record.id.to_string()));
                }
                // Deleted, expired or handed to another owner meanwhile
                _ => return Err(DocumentError::NotFound(record.id.to_string())),
            }
        };

        let decrypted = self.unseal(&record, &ciphertext)?;
        Ok((record, decrypted))
    }

    fn unseal(&self, record: &DocumentRecord, ciphertext: &[u8]) -> DocumentResult<Decrypted> {
        let id = record.id.as_str();

        let checksum = DocumentRecord::calculate_checksum(ciphertext);
        if !bool::from(checksum.as_bytes().ct_eq(record.checksum.as_bytes())) {
            return Err(self.corrupted(id, "checksum mismatch"));
        }

        let decrypted = self
            .crypto
            .decrypt_detailed(ciphertext)
            .map_err(|_| self.corrupted(id, "no configured passphrase decrypts it"))?;

        if let KeySlot::Legacy(slot) = decrypted.slot {
            self.metrics.increment_legacy_key_decrypts();
            let slot = slot.to_string();
            log_event_with_fields(
                Event::LegacyKeyDecrypt,
                &[("document_id", id), ("legacy_slot", &slot)],
            );
        }

        Ok(decrypted)
    }

    /// Best-effort removal of a superseded blob
    async fn discard_blob(&self, id: &DocumentId, blob_key: &StorageKey) {
        if let Err(e) = with_timeout(self.policy.storage_timeout, self.storage.delete(blob_key)).await
        {
            let error = e.to_string();
            log_event_with_fields(
                Event::OrphanBlob,
                &[
                    ("blob_key", blob_key.as_str()),
                    ("document_id", id.as_str()),
                    ("error", &error),
                ],
            );
        }
    }

    fn corrupted(&self, id: &str, reason: &str) -> DocumentError {
        self.metrics.increment_corrupted();
        log_event_with_fields(
            Event::DocumentCorrupted,
            &[("document_id", id), ("reason", reason)],
        );
        DocumentError::CorruptedDocument {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    fn storage_failure(&self, operation: &str, error: StorageError) -> DocumentError {
        let mapped = DocumentError::from(error);
        if let DocumentError::StorageUnavailable(reason) = &mapped {
            self.metrics.increment_storage_failures();
            log_event_with_fields(
                Event::StorageUnavailable,
                &[("operation", operation), ("reason", reason)],
            );
        }
        mapped
    }

    /// Count and log an upload that stopped at `stage`
    fn rejected(&self, stage: UploadStage, id: &DocumentId, error: DocumentError) -> DocumentError {
        match &error {
            DocumentError::UnsupportedContentType(_) | DocumentError::ContentTypeMismatch { .. } => {
                self.metrics.increment_rejected_content_type()
            }
            DocumentError::ContentRejected => self.metrics.increment_rejected_virus(),
            DocumentError::ScanUnavailable(reason) => {
                self.metrics.increment_scan_unavailable();
                log_event_with_fields(
                    Event::ScanUnavailable,
                    &[("document_id", id.as_str()), ("reason", reason)],
                );
            }
            _ => self.metrics.increment_rejected_other(),
        }

        log_event_with_fields(
            Event::UploadRejected,
            &[
                ("document_id", id.as_str()),
                ("reason", error.code()),
                ("stage", stage.as_str()),
            ],
        );
        error
    }
}

/// Metadata half of [`SealedContent`]
struct ContentMeta {
    declared: String,
    detected: String,
    size: u64,
    checksum: String,
}

impl SealedContent {
    fn meta(&self) -> ContentMeta {
        ContentMeta {
            declared: self.declared.clone(),
            detected: self.detected.clone(),
            size: self.size,
            checksum: self.checksum.clone(),
        }
    }
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("policy", &self.policy)
            .field("scan", &self.scan)
            .field("storage", &self.storage)
            .finish()
    }
}

//! # Document Model

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::errors::{DocumentError, DocumentResult};
use crate::owner::OwnerId;
use crate::storage::{StorageKey, StorageResult};

fn custom_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("custom id pattern compiles")
    })
}

/// Document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Fresh time-ordered id
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Caller-supplied id; must be usable as a storage key segment
    pub fn custom(id: impl Into<String>) -> DocumentResult<Self> {
        let id = id.into();
        if custom_id_pattern().is_match(&id) {
            Ok(Self(id))
        } else {
            Err(DocumentError::InvalidId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key for a new blob revision of this document. Every write gets its own key.
    pub fn new_blob_key(&self) -> StorageResult<StorageKey> {
        StorageKey::new(format!("{}/{}", self.0, Uuid::now_v7().simple()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upload payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: Option<String>,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl NewDocument {
    pub fn new(content_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            title: None,
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Everything the metadata store keeps about a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub owner: OwnerId,
    pub title: Option<String>,
    pub declared_content_type: String,
    pub detected_content_type: String,
    /// Plaintext size in bytes
    pub size: u64,
    /// SHA-256 of the stored ciphertext
    pub checksum: String,
    pub blob_key: StorageKey,
    pub version: u64,
    pub custom_id: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    /// Expired documents are treated as absent by every read
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |at| at <= now)
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        self.owner == *owner
    }

    /// Calculate checksum for stored bytes
    pub fn calculate_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    pub fn descriptor(&self) -> Document {
        Document {
            id: self.id.clone(),
            owner: self.owner.clone(),
            title: self.title.clone(),
            content_type: self.detected_content_type.clone(),
            declared_content_type: self.declared_content_type.clone(),
            size: self.size,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
            expires_at: self.expires_at,
        }
    }
}

/// Document descriptor returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub owner: OwnerId,
    pub title: Option<String>,
    /// Detected content type
    pub content_type: String,
    pub declared_content_type: String,
    pub size: u64,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Decrypted document as handed back to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDocument {
    pub document: Document,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Upload pipeline stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UploadStage {
    Validating,
    Scanning,
    Encrypting,
    Persisting,
    Done,
}

impl UploadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Validating => "validating",
            UploadStage::Scanning => "scanning",
            UploadStage::Encrypting => "encrypting",
            UploadStage::Persisting => "persisting",
            UploadStage::Done => "done",
        }
    }
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

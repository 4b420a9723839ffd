//! # Metadata Storage
//!
//! Document records keyed by id. Writes are compare-and-set so that two racing
//! writers for the same id cannot both commit.
//!
//! In-memory for tests, one JSON file per document for the local deployment.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};

use super::model::{DocumentId, DocumentRecord};
use crate::owner::OwnerId;
use crate::storage::{StorageError, StorageKey, StorageResult};

/// What the stored record must look like for a write to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// No record exists for the id
    Absent,
    /// The record exists and still points at this blob revision
    Revision(StorageKey),
}

impl Precondition {
    fn check(&self, id: &DocumentId, current: Option<&DocumentRecord>) -> StorageResult<()> {
        match (self, current) {
            (Precondition::Absent, None) => Ok(()),
            (Precondition::Absent, Some(_)) => {
                Err(StorageError::ObjectAlreadyExists(id.to_string()))
            }
            (Precondition::Revision(expected), Some(record)) if record.blob_key == *expected => {
                Ok(())
            }
            (Precondition::Revision(_), _) => Err(StorageError::RevisionConflict(id.to_string())),
        }
    }
}

/// Trait for metadata storage operations
pub trait MetadataStore: Send + Sync {
    /// Get a record by id, expired or not
    fn get(&self, id: &DocumentId) -> StorageResult<Option<DocumentRecord>>;

    /// Insert or replace a record if the precondition holds
    fn put(&self, record: &DocumentRecord, precondition: Precondition) -> StorageResult<()>;

    /// Remove a record if it still points at `revision`
    fn remove(&self, id: &DocumentId, revision: &StorageKey) -> StorageResult<DocumentRecord>;

    /// All records of one owner, expired included
    fn list_by_owner(&self, owner: &OwnerId) -> StorageResult<Vec<DocumentRecord>>;

    /// Records whose expiry is at or before `now`
    fn list_expired(&self, now: DateTime<Utc>) -> StorageResult<Vec<DocumentRecord>>;
}

fn remove_checked(
    id: &DocumentId,
    revision: &StorageKey,
    current: Option<&DocumentRecord>,
) -> StorageResult<()> {
    match current {
        None => Err(StorageError::ObjectNotFound(id.to_string())),
        Some(record) if record.blob_key != *revision => {
            Err(StorageError::RevisionConflict(id.to_string()))
        }
        Some(_) => Ok(()),
    }
}

fn sorted(mut records: Vec<DocumentRecord>) -> Vec<DocumentRecord> {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    records
}

// ==================
// In-memory
// ==================

/// In-memory metadata store for testing
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<HashMap<DocumentId, DocumentRecord>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn get(&self, id: &DocumentId) -> StorageResult<Option<DocumentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        Ok(records.get(id).cloned())
    }

    fn put(&self, record: &DocumentRecord, precondition: Precondition) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        precondition.check(&record.id, records.get(&record.id))?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn remove(&self, id: &DocumentId, revision: &StorageKey) -> StorageResult<DocumentRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        remove_checked(id, revision, records.get(id))?;
        records
            .remove(id)
            .ok_or_else(|| StorageError::ObjectNotFound(id.to_string()))
    }

    fn list_by_owner(&self, owner: &OwnerId) -> StorageResult<Vec<DocumentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        Ok(sorted(
            records
                .values()
                .filter(|r| r.is_owned_by(owner))
                .cloned()
                .collect(),
        ))
    }

    fn list_expired(&self, now: DateTime<Utc>) -> StorageResult<Vec<DocumentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        Ok(sorted(
            records
                .values()
                .filter(|r| r.is_expired(now))
                .cloned()
                .collect(),
        ))
    }
}

// ==================
// Local JSON files
// ==================

/// One `<id>.json` file per document under a directory.
///
/// A single process owns the directory; the mutex serializes
/// read-check-write so preconditions hold within that process.
#[derive(Debug)]
pub struct LocalMetadataStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalMetadataStore {
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::IoError(e.to_string()))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn read_record(&self, path: &Path) -> StorageResult<Option<DocumentRecord>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Internal(format!("{}: {}", path.display(), e)))
    }

    fn write_record(&self, record: &DocumentRecord) -> StorageResult<()> {
        let path = self.path_for(&record.id);
        let temp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| StorageError::Internal(e.to_string()))?;

        let mut file = fs::File::create(&temp).map_err(|e| StorageError::IoError(e.to_string()))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::rename(&temp, &path).map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn all(&self) -> StorageResult<Vec<DocumentRecord>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StorageError::IoError(e.to_string()))?;
        let mut records = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StorageError::IoError(e.to_string()))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = self.read_record(&path)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

impl MetadataStore for LocalMetadataStore {
    fn get(&self, id: &DocumentId) -> StorageResult<Option<DocumentRecord>> {
        self.read_record(&self.path_for(id))
    }

    fn put(&self, record: &DocumentRecord, precondition: Precondition) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        let current = self.read_record(&self.path_for(&record.id))?;
        precondition.check(&record.id, current.as_ref())?;
        self.write_record(record)
    }

    fn remove(&self, id: &DocumentId, revision: &StorageKey) -> StorageResult<DocumentRecord> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        let path = self.path_for(id);
        let current = self.read_record(&path)?;
        remove_checked(id, revision, current.as_ref())?;
        fs::remove_file(&path).map_err(|e| StorageError::IoError(e.to_string()))?;
        current.ok_or_else(|| StorageError::ObjectNotFound(id.to_string()))
    }

    fn list_by_owner(&self, owner: &OwnerId) -> StorageResult<Vec<DocumentRecord>> {
        Ok(sorted(
            self.all()?
                .into_iter()
                .filter(|r| r.is_owned_by(owner))
                .collect(),
        ))
    }

    fn list_expired(&self, now: DateTime<Utc>) -> StorageResult<Vec<DocumentRecord>> {
        Ok(sorted(
            self.all()?.into_iter().filter(|r| r.is_expired(now)).collect(),
        ))
    }
}

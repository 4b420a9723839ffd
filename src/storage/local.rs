//! # Local Filesystem Backend

use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::backend::{Storage, StorageKey};
use super::errors::{StorageError, StorageResult};

/// Marks in-flight writes; never part of a blob key's last segment
const STAGING_MARKER: &str = "tmp-";

fn io_error(e: io::Error) -> StorageError {
    StorageError::IoError(e.to_string())
}

/// Local filesystem storage backend
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

fn is_staging(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy()
        .rsplit_once('.')
        .map_or(false, |(_, extension)| extension.starts_with(STAGING_MARKER))
}

#[async_trait]
impl Storage for LocalBackend {
    async fn put(&self, key: &StorageKey, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::IoError(e.to_string()))?;
        }

        // Write next to the target and rename, so readers never see a partial blob
        let staging =
            full_path.with_extension(format!("{}{}", STAGING_MARKER, Uuid::new_v4().simple()));
        fs::write(&staging, &data)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        if let Err(e) = fs::rename(&staging, &full_path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(StorageError::IoError(e.to_string()));
        }

        Ok(())
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Vec<u8>> {
        fs::read(self.full_path(key)).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::ObjectNotFound(key.to_string())
            } else {
                StorageError::IoError(e.to_string())
            }
        })
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        match fs::remove_file(self.full_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn ready(&self) -> StorageResult<()> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::Unavailable(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(StorageError::Unavailable(format!(
                "{}: {}",
                self.root.display(),
                e
            ))),
        }
    }

    /// A put cancelled mid-write can still land its staging file afterwards
    async fn sweep_staging(&self, older_than: Duration) -> StorageResult<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(older_than)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let mut removed = 0;
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(e)),
            };

            while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
                let meta = entry.metadata().await.map_err(io_error)?;
                if meta.is_dir() {
                    pending.push(entry.path());
                    continue;
                }
                if !is_staging(&entry.file_name()) || meta.modified().map_err(io_error)? > cutoff {
                    continue;
                }

                match fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(io_error(e)),
                }
            }
        }

        Ok(removed)
    }
}

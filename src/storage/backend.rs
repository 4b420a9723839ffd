//! # Storage Backend Trait
//!
//! Opaque blob store. Backends only ever see ciphertext and a key.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};

/// Validated blob key: relative, `/`-separated, no `..` segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> StorageResult<Self> {
        let key = key.into();

        if key.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".to_string()));
        }
        if key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(key));
        }
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StorageError::InvalidKey(key));
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StorageKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

/// Backend trait for blob storage
#[async_trait]
pub trait Storage: Send + Sync + fmt::Debug {
    /// Store `data` under `key`, replacing anything already there
    async fn put(&self, key: &StorageKey, data: Vec<u8>) -> StorageResult<()>;

    /// Read the blob at `key`; `ObjectNotFound` if absent
    async fn get(&self, key: &StorageKey) -> StorageResult<Vec<u8>>;

    /// Remove the blob at `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &StorageKey) -> StorageResult<()>;

    /// Liveness probe; fails when the backing store is unreachable
    async fn ready(&self) -> StorageResult<()>;

    /// Remove partial writes untouched for at least `older_than`. Returns how many went.
    async fn sweep_staging(&self, _older_than: Duration) -> StorageResult<usize> {
        Ok(0)
    }
}

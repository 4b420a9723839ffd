//! # In-Memory Backend

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::backend::{Storage, StorageKey};
use super::errors::{StorageError, StorageResult};

/// Process-local blob store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryBackend {
    blobs: RwLock<HashMap<StorageKey, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<StorageKey> {
        let mut keys: Vec<_> = self
            .blobs
            .read()
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl Storage for MemoryBackend {
    async fn put(&self, key: &StorageKey, data: Vec<u8>) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        blobs.insert(key.clone(), data);
        Ok(())
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Vec<u8>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        blobs
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StorageError::Internal("Lock poisoned".to_string()))?;
        blobs.remove(key);
        Ok(())
    }

    async fn ready(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let backend = MemoryBackend::new();
        let key = StorageKey::new("a/1").unwrap();

        backend.put(&key, b"x".to_vec()).await.unwrap();
        assert_eq!(backend.get(&key).await.unwrap(), b"x");
        assert_eq!(backend.keys(), vec![key.clone()]);

        backend.delete(&key).await.unwrap();
        backend.delete(&key).await.unwrap();
        assert!(backend.is_empty());
        assert!(matches!(
            backend.get(&key).await,
            Err(StorageError::ObjectNotFound(_))
        ));
    }
}

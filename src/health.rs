//! # Health Check
//!
//! Readiness of the storage backend, reported separately from the document pipeline.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::observability::{log_event_with_fields, Event};
use crate::storage::{Storage, StorageError};

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: String,
    pub version: String,
}

/// Probe wrapping a storage backend's `ready`
#[derive(Debug, Clone)]
pub struct StorageHealthCheck {
    storage: Arc<dyn Storage>,
    timeout: Duration,
}

impl StorageHealthCheck {
    pub fn new(storage: Arc<dyn Storage>, timeout: Duration) -> Self {
        Self { storage, timeout }
    }

    pub async fn check(&self) -> HealthReport {
        let outcome = match tokio::time::timeout(self.timeout, self.storage.ready()).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(()) => HealthReport {
                name: "storage".to_string(),
                healthy: true,
                message: "ok".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            Err(e) => {
                let message = e.to_string();
                log_event_with_fields(Event::StorageUnhealthy, &[("reason", &message)]);
                HealthReport {
                    name: "storage".to_string(),
                    healthy: false,
                    message,
                    version: env!("CARGO_PKG_VERSION").to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalBackend, MemoryBackend};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ready_backend_is_healthy() {
        let check = StorageHealthCheck::new(Arc::new(MemoryBackend::new()), Duration::from_secs(1));
        let report = check.check().await;

        assert!(report.healthy);
        assert_eq!(report.name, "storage");
    }

    #[tokio::test]
    async fn test_missing_root_is_unhealthy() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new(dir.path().join("does-not-exist"));
        let check = StorageHealthCheck::new(Arc::new(backend), Duration::from_secs(1));

        let report = check.check().await;
        assert!(!report.healthy);
        assert!(!report.message.is_empty());
    }

    #[test]
    fn test_report_serialization() {
        let report = HealthReport {
            name: "storage".to_string(),
            healthy: true,
            message: "ok".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"healthy\":true"));
    }
}

//! # Virus Scan Gate
//!
//! ## Invariants
//! - Scanning is either explicitly disabled or required; there is no implicit skip
//! - When required, anything short of a `Clean` verdict rejects the upload

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::errors::{ScanError, ScanResult};
use crate::document::errors::{DocumentError, DocumentResult};

/// Outcome of a completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    Clean,
    Infected,
}

/// A virus-scan provider
#[async_trait]
pub trait VirusScanner: Send + Sync {
    async fn scan(&self, content: &[u8]) -> ScanResult<ScanVerdict>;
}

/// Scan policy applied to every upload
#[derive(Clone)]
pub enum ScanGate {
    /// Documents pass without a remote call
    Disabled,
    /// Every document must come back `Clean` within `timeout`
    Required {
        scanner: Arc<dyn VirusScanner>,
        timeout: Duration,
    },
}

impl ScanGate {
    pub fn required(scanner: Arc<dyn VirusScanner>, timeout: Duration) -> Self {
        ScanGate::Required { scanner, timeout }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ScanGate::Required { .. })
    }

    /// Let `content` through or reject it
    pub async fn check(&self, content: &[u8]) -> DocumentResult<()> {
        let (scanner, timeout) = match self {
            ScanGate::Disabled => return Ok(()),
            ScanGate::Required { scanner, timeout } => (scanner, *timeout),
        };

        let verdict = match tokio::time::timeout(timeout, scanner.scan(content)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout(timeout)),
        };

        match verdict {
            Ok(ScanVerdict::Clean) => Ok(()),
            Ok(ScanVerdict::Infected) => Err(DocumentError::ContentRejected),
            Err(e) => Err(DocumentError::ScanUnavailable(e.to_string())),
        }
    }
}

impl fmt::Debug for ScanGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanGate::Disabled => f.write_str("ScanGate::Disabled"),
            ScanGate::Required { timeout, .. } => f
                .debug_struct("ScanGate::Required")
                .field("timeout", timeout)
                .finish(),
        }
    }
}

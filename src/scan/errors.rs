//! # Scan Errors

use std::time::Duration;

use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Failures to obtain a verdict. Never a verdict in itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Scan provider could not be reached
    #[error("Scan provider unreachable: {0}")]
    Unreachable(String),

    /// Scan provider answered with a non-success status
    #[error("Scan provider returned status {0}")]
    BadStatus(u16),

    /// Scan provider answered with something we cannot interpret
    #[error("Invalid scan response: {0}")]
    InvalidResponse(String),

    #[error("Scan timed out after {0:?}")]
    Timeout(Duration),
}

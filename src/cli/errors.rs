//! CLI-specific error types
//!
//! Every CLI failure ends the process with a non-zero exit.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::crypto::CryptoError;
use crate::document::DocumentError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Malformed argument
    InvalidArgument,
    /// Components could not be assembled
    BootFailed,
    /// Document operation failed
    Document(DocumentError),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DOCGATE_CLI_CONFIG_ERROR",
            Self::IoError => "DOCGATE_CLI_IO_ERROR",
            Self::InvalidArgument => "DOCGATE_CLI_INVALID_ARGUMENT",
            Self::BootFailed => "DOCGATE_CLI_BOOT_FAILED",
            Self::Document(e) => e.code(),
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<CryptoError> for CliError {
    fn from(e: CryptoError) -> Self {
        Self::boot_failed(format!("key ring: {}", e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::boot_failed(format!("storage: {}", e))
    }
}

impl From<DocumentError> for CliError {
    fn from(e: DocumentError) -> Self {
        let message = e.to_string();
        Self::new(CliErrorCode::Document(e), message)
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_errors_keep_their_code() {
        let err = CliError::from(DocumentError::Forbidden);
        assert_eq!(err.code_str(), "DOCGATE_FORBIDDEN");
        assert_eq!(err.message(), "Forbidden");
    }

    #[test]
    fn test_config_error_code() {
        let err = CliError::from(ConfigError::Invalid("x".to_string()));
        assert_eq!(err.code_str(), "DOCGATE_CLI_CONFIG_ERROR");
        assert!(err.to_string().starts_with("DOCGATE_CLI_CONFIG_ERROR: "));
    }
}

//! # Configuration
//!
//! One JSON file, loaded once and passed by value into constructors.
//! Passphrases may come from the environment instead of the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::CryptoConfig;
use crate::document::{DocumentPolicy, DEFAULT_MAX_DOCUMENT_BYTES};
use crate::owner::{ClaimOwnerResolver, DEFAULT_OWNER_CLAIM};
use crate::scan::{HttpVirusScanner, ScanGate};

/// Overrides `crypto.encryption_passphrase`
pub const ENV_ENCRYPTION_PASSPHRASE: &str = "DOCGATE_ENCRYPTION_PASSPHRASE";

/// Overrides `crypto.decryption_passphrases`; comma-separated, order kept
pub const ENV_DECRYPTION_PASSPHRASES: &str = "DOCGATE_DECRYPTION_PASSPHRASES";

/// Upper bound on `expiry.default_ttl_hours` (100 years)
pub const MAX_DEFAULT_TTL_HOURS: u64 = 100 * 365 * 24;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Virus-scan provider settings. Enabled unless switched off explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirusScanConfig {
    #[serde(default = "default_scan_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_scan_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_scan_enabled() -> bool {
    true
}
fn default_scan_timeout_ms() -> u64 {
    10_000
}

impl Default for VirusScanConfig {
    fn default() -> Self {
        Self {
            enabled: default_scan_enabled(),
            url: None,
            timeout_ms: default_scan_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
}

fn default_storage_timeout_ms() -> u64 {
    30_000
}
fn default_max_document_bytes() -> u64 {
    DEFAULT_MAX_DOCUMENT_BYTES
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_storage_timeout_ms(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryConfig {
    /// Honour caller-supplied expiry on custom-id uploads
    #[serde(default)]
    pub allow_caller_expiry: bool,

    /// TTL applied when no caller expiry is used; none means documents never expire
    #[serde(default)]
    pub default_ttl_hours: Option<u64>,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root for blobs and metadata (required)
    pub data_dir: PathBuf,

    #[serde(default)]
    pub crypto: CryptoConfig,

    #[serde(default)]
    pub virus_scan: VirusScanConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub expiry: ExpiryConfig,

    /// Token claim naming the document owner
    #[serde(default = "default_owner_claim")]
    pub owner_claim: String,
}

fn default_owner_claim() -> String {
    DEFAULT_OWNER_CLAIM.to_string()
}

impl Config {
    /// Load configuration from file, apply environment overrides, validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut config = Self::from_json(&content)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Replace passphrases with values found through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(passphrase) = lookup(ENV_ENCRYPTION_PASSPHRASE) {
            self.crypto.encryption_passphrase = passphrase;
        }

        if let Some(list) = lookup(ENV_DECRYPTION_PASSPHRASES) {
            self.crypto.decryption_passphrases = list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must be set".to_string()));
        }

        if self.crypto.encryption_passphrase.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "crypto.encryption_passphrase must be set (or {})",
                ENV_ENCRYPTION_PASSPHRASE
            )));
        }

        if self.virus_scan.enabled {
            match self.virus_scan.url.as_deref() {
                None | Some("") => {
                    return Err(ConfigError::Invalid(
                        "virus_scan.url is required while virus_scan.enabled is true".to_string(),
                    ))
                }
                Some(_) => {}
            }
        }

        if self.virus_scan.timeout_ms == 0 {
            return Err(ConfigError::Invalid("virus_scan.timeout_ms must be > 0".to_string()));
        }

        if self.storage.timeout_ms == 0 {
            return Err(ConfigError::Invalid("storage.timeout_ms must be > 0".to_string()));
        }

        if self.storage.max_document_bytes == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_document_bytes must be > 0".to_string(),
            ));
        }

        match self.expiry.default_ttl_hours {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "expiry.default_ttl_hours must be > 0 when set".to_string(),
                ))
            }
            Some(hours) if hours > MAX_DEFAULT_TTL_HOURS => {
                return Err(ConfigError::Invalid(format!(
                    "expiry.default_ttl_hours must be <= {}",
                    MAX_DEFAULT_TTL_HOURS
                )))
            }
            _ => {}
        }

        if self.owner_claim.trim().is_empty() {
            return Err(ConfigError::Invalid("owner_claim must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.data_dir.join("metadata")
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage.timeout_ms)
    }

    pub fn document_policy(&self) -> DocumentPolicy {
        DocumentPolicy {
            allow_caller_expiry: self.expiry.allow_caller_expiry,
            default_ttl: self
                .expiry
                .default_ttl_hours
                .and_then(|h| chrono::Duration::try_hours(h.min(MAX_DEFAULT_TTL_HOURS) as i64)),
            storage_timeout: self.storage_timeout(),
            max_document_bytes: self.storage.max_document_bytes,
        }
    }

    /// Scan policy; `Disabled` only when switched off in the file
    pub fn scan_gate(&self) -> ConfigResult<ScanGate> {
        if !self.virus_scan.enabled {
            return Ok(ScanGate::Disabled);
        }

        let url = self
            .virus_scan
            .url
            .clone()
            .ok_or_else(|| ConfigError::Invalid("virus_scan.url missing".to_string()))?;
        let timeout = Duration::from_millis(self.virus_scan.timeout_ms);
        let scanner = HttpVirusScanner::new(url, timeout)
            .map_err(|e| ConfigError::Invalid(format!("virus scan client: {}", e)))?;

        Ok(ScanGate::required(Arc::new(scanner), timeout))
    }

    pub fn owner_resolver(&self) -> ClaimOwnerResolver {
        ClaimOwnerResolver::new(self.owner_claim.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MINIMAL: &str = r#"{
        "data_dir": "/var/lib/docgate",
        "crypto": { "encryption_passphrase": "secret" },
        "virus_scan": { "url": "http://localhost:8080/scan" }
    }"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(MINIMAL).unwrap();
        config.validate().unwrap();

        assert!(config.virus_scan.enabled);
        assert_eq!(config.virus_scan.timeout_ms, 10_000);
        assert_eq!(config.storage.timeout_ms, 30_000);
        assert_eq!(config.storage.max_document_bytes, DEFAULT_MAX_DOCUMENT_BYTES);
        assert!(!config.expiry.allow_caller_expiry);
        assert_eq!(config.expiry.default_ttl_hours, None);
        assert_eq!(config.owner_claim, "pid");
        assert_eq!(config.blob_dir(), PathBuf::from("/var/lib/docgate/blobs"));
    }

    #[test]
    fn test_scan_enabled_without_url_is_rejected() {
        let config = Config::from_json(
            r#"{"data_dir": "/tmp/d", "crypto": {"encryption_passphrase": "s"}}"#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_scan_can_be_disabled_explicitly() {
        let config = Config::from_json(
            r#"{"data_dir": "/tmp/d", "crypto": {"encryption_passphrase": "s"},
                "virus_scan": {"enabled": false}}"#,
        )
        .unwrap();

        config.validate().unwrap();
        assert!(!config.scan_gate().unwrap().is_enabled());
    }

    #[test]
    fn test_missing_passphrase_is_rejected() {
        let config = Config::from_json(
            r#"{"data_dir": "/tmp/d", "virus_scan": {"enabled": false}}"#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_overrides_passphrases() {
        let mut config = Config::from_json(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_ENCRYPTION_PASSPHRASE, "from-env"),
            (ENV_DECRYPTION_PASSPHRASES, "older, oldest,"),
        ]
        .into_iter()
        .collect();

        config.apply_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.crypto.encryption_passphrase, "from-env");
        assert_eq!(config.crypto.decryption_passphrases, vec!["older", "oldest"]);
    }

    #[test]
    fn test_document_policy() {
        let config = Config::from_json(
            r#"{"data_dir": "/tmp/d", "crypto": {"encryption_passphrase": "s"},
                "virus_scan": {"enabled": false},
                "storage": {"timeout_ms": 1500},
                "expiry": {"allow_caller_expiry": true, "default_ttl_hours": 24}}"#,
        )
        .unwrap();

        let policy = config.document_policy();
        assert!(policy.allow_caller_expiry);
        assert_eq!(policy.default_ttl, Some(chrono::Duration::hours(24)));
        assert_eq!(policy.storage_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_default_ttl_is_bounded() {
        let config = Config::from_json(
            r#"{"data_dir": "/tmp/d", "crypto": {"encryption_passphrase": "s"},
                "virus_scan": {"enabled": false},
                "expiry": {"default_ttl_hours": 10000000000}}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = config;
        config.expiry.default_ttl_hours = Some(MAX_DEFAULT_TTL_HOURS);
        config.validate().unwrap();
        assert_eq!(
            config.document_policy().default_ttl,
            Some(chrono::Duration::hours(MAX_DEFAULT_TTL_HOURS as i64))
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/docgate.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

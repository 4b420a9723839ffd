//! # Passphrase Key Ring
//!
//! AES-256-GCM encryption of document payloads under passphrase-derived keys.
//!
//! ## Invariants
//! - New ciphertext is always sealed under the current passphrase
//! - Decryption tries the current key, then legacy keys in configured order
//! - A wrong key or a flipped byte is rejected by the GCM tag, never returned as plaintext
//!
//! ## Envelope
//! `[format: 1 byte][nonce: 12 bytes][ciphertext || tag: n + 16 bytes]`

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::errors::{CryptoError, CryptoResult};

const FORMAT_V1: u8 = 0x01;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Fixed KDF salt. Key derivation has to be reproducible from the passphrase alone,
/// so the salt is an application constant rather than a per-envelope value.
const KDF_SALT: &[u8] = b"docgate/document-encryption/v1";

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfConfig {
    /// Memory cost in KiB
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    /// Number of passes
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl KdfConfig {
    /// Smallest parameters Argon2 accepts. Only meant for tests.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Passphrases the key ring is built from
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Passphrase for all new encryption
    #[serde(default)]
    pub encryption_passphrase: String,

    /// Retired passphrases, decrypt-only, tried in this order
    #[serde(default)]
    pub decryption_passphrases: Vec<String>,

    #[serde(default)]
    pub kdf: KdfConfig,
}

impl CryptoConfig {
    pub fn new(encryption_passphrase: impl Into<String>) -> Self {
        Self {
            encryption_passphrase: encryption_passphrase.into(),
            decryption_passphrases: Vec::new(),
            kdf: KdfConfig::default(),
        }
    }

    pub fn with_legacy(mut self, passphrase: impl Into<String>) -> Self {
        self.decryption_passphrases.push(passphrase.into());
        self
    }

    pub fn with_kdf(mut self, kdf: KdfConfig) -> Self {
        self.kdf = kdf;
        self
    }
}

impl fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("encryption_passphrase", &"<redacted>")
            .field("decryption_passphrases", &self.decryption_passphrases.len())
            .field("kdf", &self.kdf)
            .finish()
    }
}

/// Which key in the ring opened a ciphertext
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    Current,
    /// Index into the configured legacy list
    Legacy(usize),
}

/// Plaintext plus the key slot that opened it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted {
    pub plaintext: Vec<u8>,
    pub slot: KeySlot,
}

/// Ordered key ring: slot 0 is current, the rest are legacy
pub struct Cryptography {
    ciphers: Vec<Aes256Gcm>,
}

impl Cryptography {
    /// Derive every configured key up front.
    ///
    /// Derivation is the expensive part; after this, encrypt/decrypt are cheap.
    pub fn new(config: &CryptoConfig) -> CryptoResult<Self> {
        let params = Params::new(
            config.kdf.memory_kib,
            config.kdf.iterations,
            config.kdf.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        if config.encryption_passphrase.is_empty() {
            return Err(CryptoError::InvalidKeyMaterial(
                "encryption passphrase must not be empty".to_string(),
            ));
        }

        let mut ciphers = Vec::with_capacity(1 + config.decryption_passphrases.len());
        ciphers.push(derive_cipher(&argon2, &config.encryption_passphrase)?);

        for (index, passphrase) in config.decryption_passphrases.iter().enumerate() {
            if passphrase.is_empty() {
                return Err(CryptoError::InvalidKeyMaterial(format!(
                    "decryption passphrase #{} must not be empty",
                    index
                )));
            }
            ciphers.push(derive_cipher(&argon2, passphrase)?);
        }

        Ok(Self { ciphers })
    }

    /// Number of legacy (decrypt-only) keys
    pub fn legacy_key_count(&self) -> usize {
        self.ciphers.len() - 1
    }

    /// Seal `plaintext` under the current key with a fresh random nonce
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self.ciphers[0]
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut envelope = Vec::with_capacity(1 + NONCE_LEN + sealed.len());
        envelope.push(FORMAT_V1);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);
        Ok(envelope)
    }

    /// Open `ciphertext` with the first key in the ring that authenticates it
    pub fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        self.decrypt_detailed(ciphertext).map(|d| d.plaintext)
    }

    /// Like [`decrypt`](Self::decrypt), also reporting which key slot succeeded
    pub fn decrypt_detailed(&self, ciphertext: &[u8]) -> CryptoResult<Decrypted> {
        if ciphertext.len() < 1 + NONCE_LEN + TAG_LEN || ciphertext[0] != FORMAT_V1 {
            return Err(CryptoError::DecryptionFailed);
        }

        let nonce = Nonce::from_slice(&ciphertext[1..1 + NONCE_LEN]);
        let sealed = &ciphertext[1 + NONCE_LEN..];

        for (index, cipher) in self.ciphers.iter().enumerate() {
            if let Ok(plaintext) = cipher.decrypt(nonce, sealed) {
                let slot = match index {
                    0 => KeySlot::Current,
                    n => KeySlot::Legacy(n - 1),
                };
                return Ok(Decrypted { plaintext, slot });
            }
        }

        Err(CryptoError::DecryptionFailed)
    }
}

impl fmt::Debug for Cryptography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cryptography")
            .field("legacy_keys", &self.legacy_key_count())
            .finish()
    }
}

fn derive_cipher(argon2: &Argon2<'_>, passphrase: &str) -> CryptoResult<Aes256Gcm> {
    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), KDF_SALT, &mut key)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)))
}

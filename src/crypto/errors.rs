//! # Crypto Errors

use thiserror::Error;

/// Result type for crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Encryption and key-ring errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// A configured passphrase is unusable
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Key derivation parameters rejected by the KDF
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    /// AEAD sealing failed
    #[error("Encryption failed")]
    EncryptionFailed,

    /// No configured passphrase could open the ciphertext.
    ///
    /// Deliberately carries no detail: the caller cannot tell a wrong key from a
    /// tampered or truncated envelope.
    #[error("Decryption failed")]
    DecryptionFailed,
}

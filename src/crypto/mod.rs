//! # docgate Crypto Module
//!
//! Encryption at rest for stored documents, with passphrase rotation.

pub mod errors;
pub mod keyring;

pub use errors::{CryptoError, CryptoResult};
pub use keyring::{CryptoConfig, Cryptography, Decrypted, KdfConfig, KeySlot};

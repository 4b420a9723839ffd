//! # docgate Storage Module
//!
//! Blob storage for encrypted documents. Backends see ciphertext and keys only.

pub mod backend;
pub mod errors;
pub mod local;
pub mod memory;

pub use backend::{Storage, StorageKey};
pub use errors::{StorageError, StorageResult};
pub use local::LocalBackend;
pub use memory::MemoryBackend;

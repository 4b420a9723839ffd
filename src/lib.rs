//! docgate - an encrypting, scanning, owner-scoped document storage gateway
//!
//! Documents pass a content-type check and a virus-scan gate, are sealed with
//! AES-256-GCM under a rotating passphrase key ring, and are stored as opaque blobs.
//! Only the owner can read, update or delete them.

pub mod cli;
pub mod config;
pub mod content_type;
pub mod crypto;
pub mod document;
pub mod health;
pub mod observability;
pub mod owner;
pub mod scan;
pub mod storage;

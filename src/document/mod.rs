//! # docgate Document Module
//!
//! Owner-scoped document lifecycle on top of storage, scanning and encryption.
//!
//! ## Structure
//! - `model`: ids, records, descriptors
//! - `metadata`: per-document records with compare-and-set writes
//! - `service`: the upload pipeline and owner-scoped operations
//! - `errors`: the error taxonomy callers see

pub mod errors;
pub mod metadata;
pub mod model;
pub mod service;

pub use errors::{DocumentError, DocumentResult};
pub use metadata::{InMemoryMetadataStore, LocalMetadataStore, MetadataStore, Precondition};
pub use model::{Document, DocumentId, DocumentRecord, DownloadedDocument, NewDocument, UploadStage};
pub use service::{DocumentPolicy, DocumentService, DEFAULT_MAX_DOCUMENT_BYTES};

//! Shared doubles for the document pipeline tests
//!
//! - A storage backend that records every call and can be told to fail or stall
//! - A scanner with a fixed behaviour
//! - A harness wiring both into a DocumentService

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use docgate::content_type::ContentTypeService;
use docgate::crypto::{CryptoConfig, Cryptography, KdfConfig};
use docgate::document::{DocumentPolicy, DocumentService, InMemoryMetadataStore};
use docgate::scan::{ScanError, ScanGate, ScanResult, ScanVerdict, VirusScanner};
use docgate::storage::{MemoryBackend, Storage, StorageError, StorageKey, StorageResult};

// =============================================================================
// Fixtures
// =============================================================================

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n%%EOF\n";
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00,
];
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52,
];

pub fn crypto(current: &str, legacy: &[&str]) -> Arc<Cryptography> {
    let mut config = CryptoConfig::new(current).with_kdf(KdfConfig::insecure_fast());
    for passphrase in legacy {
        config = config.with_legacy(*passphrase);
    }
    Arc::new(Cryptography::new(&config).expect("key ring"))
}

// =============================================================================
// Recording storage
// =============================================================================

/// Memory backend that logs every call and fails on request
#[derive(Debug, Default)]
pub struct RecordingStorage {
    inner: MemoryBackend,
    calls: Mutex<Vec<String>>,
    fail_puts: AtomicBool,
    fail_gets: AtomicBool,
    put_delay_ms: AtomicU64,
    get_delay_ms: AtomicU64,
    failing_deletes: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("put ")).count()
    }

    pub fn blob_count(&self) -> usize {
        self.inner.len()
    }

    pub fn keys(&self) -> Vec<StorageKey> {
        self.inner.keys()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Every put sleeps this long before writing
    pub fn delay_puts(&self, delay: Duration) {
        self.put_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Every get sleeps this long before reading
    pub fn delay_gets(&self, delay: Duration) {
        self.get_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Deletes of any blob under `document_id` fail
    pub fn fail_deletes_under(&self, document_id: &str) {
        self.failing_deletes
            .lock()
            .unwrap()
            .push(format!("{}/", document_id));
    }

    /// Flip one byte of a stored blob, bypassing the call log
    pub async fn tamper(&self, key: &StorageKey, index: usize) {
        let mut bytes = self.inner.get(key).await.unwrap();
        bytes[index] ^= 0x01;
        self.inner.put(key, bytes).await.unwrap();
    }

    /// Stored bytes, bypassing the call log
    pub async fn raw(&self, key: &StorageKey) -> Vec<u8> {
        self.inner.get(key).await.unwrap()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn stall(delay_ms: &AtomicU64) {
        let delay = delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put(&self, key: &StorageKey, data: Vec<u8>) -> StorageResult<()> {
        self.record(format!("put {}", key));
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected put failure".to_string()));
        }
        Self::stall(&self.put_delay_ms).await;
        self.inner.put(key, data).await
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Vec<u8>> {
        self.record(format!("get {}", key));
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected get failure".to_string()));
        }
        Self::stall(&self.get_delay_ms).await;
        self.inner.get(key).await
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        self.record(format!("delete {}", key));
        let failing = self
            .failing_deletes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| key.as_str().starts_with(prefix.as_str()));
        if failing {
            return Err(StorageError::Unavailable("injected delete failure".to_string()));
        }
        self.inner.delete(key).await
    }

    async fn ready(&self) -> StorageResult<()> {
        self.inner.ready().await
    }
}

// =============================================================================
// Stub scanner
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub enum ScanBehaviour {
    Clean,
    Infected,
    Unreachable,
    Hang,
}

#[derive(Debug)]
pub struct StubScanner {
    behaviour: ScanBehaviour,
    calls: AtomicUsize,
}

impl StubScanner {
    pub fn new(behaviour: ScanBehaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VirusScanner for StubScanner {
    async fn scan(&self, _content: &[u8]) -> ScanResult<ScanVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            ScanBehaviour::Clean => Ok(ScanVerdict::Clean),
            ScanBehaviour::Infected => Ok(ScanVerdict::Infected),
            ScanBehaviour::Unreachable => Err(ScanError::Unreachable("connection refused".into())),
            ScanBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ScanVerdict::Clean)
            }
        }
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub service: Arc<DocumentService>,
    pub storage: Arc<RecordingStorage>,
    pub metadata: Arc<InMemoryMetadataStore>,
    pub scanner: Option<Arc<StubScanner>>,
}

pub struct HarnessBuilder {
    policy: DocumentPolicy,
    crypto: Arc<Cryptography>,
    scan: Option<ScanBehaviour>,
    storage: Arc<RecordingStorage>,
    metadata: Arc<InMemoryMetadataStore>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder {
            policy: DocumentPolicy::default(),
            crypto: crypto("current-passphrase", &[]),
            scan: None,
            storage: Arc::new(RecordingStorage::new()),
            metadata: Arc::new(InMemoryMetadataStore::new()),
        }
    }

    /// Scanning disabled, default policy
    pub fn new() -> Self {
        Self::builder().build()
    }
}

impl HarnessBuilder {
    pub fn policy(mut self, policy: DocumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn crypto(mut self, crypto: Arc<Cryptography>) -> Self {
        self.crypto = crypto;
        self
    }

    pub fn scanner(mut self, behaviour: ScanBehaviour) -> Self {
        self.scan = Some(behaviour);
        self
    }

    /// Reuse the stores of an earlier harness
    pub fn stores(mut self, other: &Harness) -> Self {
        self.storage = other.storage.clone();
        self.metadata = other.metadata.clone();
        self
    }

    pub fn build(self) -> Harness {
        let scanner = self.scan.map(|b| Arc::new(StubScanner::new(b)));
        let gate = match &scanner {
            Some(s) => ScanGate::required(s.clone(), Duration::from_millis(200)),
            None => ScanGate::Disabled,
        };

        let service = DocumentService::new(
            self.policy,
            self.crypto,
            Arc::new(ContentTypeService::new()),
            gate,
            self.storage.clone(),
            self.metadata.clone(),
        );

        Harness {
            service: Arc::new(service),
            storage: self.storage,
            metadata: self.metadata,
            scanner,
        }
    }
}

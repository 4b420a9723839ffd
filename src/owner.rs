//! # Owner Resolution
//!
//! Maps an already-verified caller identity to the owner id that scopes every
//! document operation.
//!
//! ## Invariants
//! - Resolution is pure: same identity, same owner, no I/O
//! - Resolution is total over verified identities

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Claim carrying the personal identifier in the upstream identity provider's tokens
pub const DEFAULT_OWNER_CLAIM: &str = "pid";

/// Principal that exclusively controls a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short stable digest for logs; owner ids are personal data and never logged raw
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller identity as handed over by the authentication layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticatedIdentity {
    /// `sub` claim
    pub subject: String,

    /// `iss` claim
    pub issuer: String,

    /// Remaining token claims
    pub claims: HashMap<String, serde_json::Value>,
}

impl AuthenticatedIdentity {
    pub fn new(subject: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issuer: issuer.into(),
            claims: HashMap::new(),
        }
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.claims.insert(name.into(), value);
        self
    }

    /// String claim by name, if present and non-empty
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.claims
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Identity → owner mapping
pub trait OwnerResolver: Send + Sync {
    fn resolve(&self, identity: &AuthenticatedIdentity) -> OwnerId;
}

/// Uses a configured claim when the token has it, the subject otherwise
#[derive(Debug, Clone)]
pub struct ClaimOwnerResolver {
    claim: String,
}

impl Default for ClaimOwnerResolver {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER_CLAIM)
    }
}

impl ClaimOwnerResolver {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
        }
    }
}

impl OwnerResolver for ClaimOwnerResolver {
    fn resolve(&self, identity: &AuthenticatedIdentity) -> OwnerId {
        match identity.string_claim(&self.claim) {
            Some(value) => OwnerId::new(value),
            None => OwnerId::new(identity.subject.clone()),
        }
    }
}

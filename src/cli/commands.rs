//! CLI command implementations
//!
//! Each command loads the configuration, assembles the gateway and runs a single
//! document operation, answering with one JSON object.

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::Config;
use crate::content_type::ContentTypeService;
use crate::crypto::Cryptography;
use crate::document::{DocumentId, DocumentService, LocalMetadataStore, NewDocument};
use crate::health::StorageHealthCheck;
use crate::observability::{log_event_with_fields, Event};
use crate::owner::{AuthenticatedIdentity, ClaimOwnerResolver, OwnerId, OwnerResolver};
use crate::storage::{LocalBackend, Storage};

use super::args::{Command, ContentArgs, IdentityArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_content, write_response};

/// Fully wired components for one process
pub struct Gateway {
    pub service: DocumentService,
    pub health: StorageHealthCheck,
    pub resolver: ClaimOwnerResolver,
}

impl Gateway {
    /// Build every component from configuration. Derives all keys up front.
    pub fn assemble(config: &Config) -> CliResult<Self> {
        let blob_dir = config.blob_dir();
        std::fs::create_dir_all(&blob_dir).map_err(|e| {
            CliError::boot_failed(format!("Failed to create {}: {}", blob_dir.display(), e))
        })?;

        let storage: Arc<dyn Storage> = Arc::new(LocalBackend::new(blob_dir));
        let metadata = Arc::new(LocalMetadataStore::open(config.metadata_dir())?);
        let crypto = Arc::new(Cryptography::new(&config.crypto)?);
        let scan = config.scan_gate()?;

        let data_dir = config.data_dir.display().to_string();
        let scan_enabled = scan.is_enabled().to_string();
        let legacy_keys = crypto.legacy_key_count().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("data_dir", &data_dir),
                ("legacy_keys", &legacy_keys),
                ("scan_enabled", &scan_enabled),
            ],
        );

        let service = DocumentService::new(
            config.document_policy(),
            crypto,
            Arc::new(ContentTypeService::new()),
            scan,
            Arc::clone(&storage),
            metadata,
        );
        let health = StorageHealthCheck::new(storage, config.storage_timeout());

        log_event_with_fields(Event::GatewayReady, &[("data_dir", &data_dir)]);

        Ok(Self {
            service,
            health,
            resolver: config.owner_resolver(),
        })
    }

    pub fn owner(&self, identity: &IdentityArgs) -> CliResult<OwnerId> {
        Ok(self.resolver.resolve(&parse_identity(identity)?))
    }
}

/// Parse args and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command).await
}

/// Run the appropriate command based on CLI args
pub async fn run_command(cmd: Command) -> CliResult<()> {
    let output = match cmd {
        Command::Upload {
            config,
            identity,
            content,
            id,
            expires_at,
        } => {
            let gateway = boot(&config)?;
            upload(&gateway, &identity, &content, id, expires_at).await?
        }
        Command::Update {
            config,
            identity,
            content,
            id,
        } => {
            let gateway = boot(&config)?;
            update(&gateway, &identity, &content, &id).await?
        }
        Command::Download {
            config,
            identity,
            id,
            out,
        } => {
            let gateway = boot(&config)?;
            download(&gateway, &identity, &id, out.as_deref()).await?
        }
        Command::Delete {
            config,
            identity,
            id,
        } => {
            let gateway = boot(&config)?;
            delete(&gateway, &identity, &id).await?
        }
        Command::List { config, identity } => {
            let gateway = boot(&config)?;
            list(&gateway, &identity)?
        }
        Command::Health { config } => {
            let gateway = boot(&config)?;
            health(&gateway).await?
        }
        Command::Purge { config } => {
            let gateway = boot(&config)?;
            let purged = gateway.service.purge_expired().await?;
            json!({ "purged": purged })
        }
        Command::Reencrypt { config, id } => {
            let gateway = boot(&config)?;
            let id = DocumentId::custom(id)?;
            let reencrypted = gateway.service.reencrypt(&id).await?;
            json!({ "id": id, "reencrypted": reencrypted })
        }
    };

    write_response(output)
}

fn boot(config_path: &Path) -> CliResult<Gateway> {
    let config = Config::load(config_path)?;
    Gateway::assemble(&config)
}

// ==================
// Commands
// ==================

pub async fn upload(
    gateway: &Gateway,
    identity: &IdentityArgs,
    content: &ContentArgs,
    id: Option<String>,
    expires_at: Option<String>,
) -> CliResult<Value> {
    let owner = gateway.owner(identity)?;
    let document = read_document(content)?;

    let uploaded = match id {
        Some(id) => {
            let id = DocumentId::custom(id)?;
            let expires_at = expires_at.as_deref().map(parse_timestamp).transpose()?;
            gateway
                .service
                .upload_with_custom_id(&owner, id, document, expires_at)
                .await?
        }
        None if expires_at.is_some() => {
            return Err(CliError::invalid_argument(
                "--expires-at is only accepted together with --id",
            ))
        }
        None => gateway.service.upload(&owner, document).await?,
    };

    Ok(serde_json::to_value(uploaded)?)
}

pub async fn update(
    gateway: &Gateway,
    identity: &IdentityArgs,
    content: &ContentArgs,
    id: &str,
) -> CliResult<Value> {
    let owner = gateway.owner(identity)?;
    let id = DocumentId::custom(id)?;
    let document = read_document(content)?;

    let updated = gateway.service.update_content(&owner, &id, document).await?;
    Ok(serde_json::to_value(updated)?)
}

pub async fn download(
    gateway: &Gateway,
    identity: &IdentityArgs,
    id: &str,
    out: Option<&Path>,
) -> CliResult<Value> {
    let owner = gateway.owner(identity)?;
    let id = DocumentId::custom(id)?;
    let downloaded = gateway.service.download(&owner, &id).await?;

    let mut output = json!({
        "document": downloaded.document,
        "content_type": downloaded.content_type,
    });

    match out {
        Some(path) => {
            std::fs::write(path, &downloaded.content).map_err(|e| {
                CliError::io_error(format!("Failed to write {}: {}", path.display(), e))
            })?;
            output["written_to"] = json!(path.display().to_string());
        }
        None => {
            output["content_base64"] = json!(BASE64.encode(&downloaded.content));
        }
    }

    Ok(output)
}

pub async fn delete(gateway: &Gateway, identity: &IdentityArgs, id: &str) -> CliResult<Value> {
    let owner = gateway.owner(identity)?;
    let id = DocumentId::custom(id)?;
    let deleted = gateway.service.delete(&owner, &id).await?;
    Ok(json!({ "id": id, "deleted": deleted }))
}

pub fn list(gateway: &Gateway, identity: &IdentityArgs) -> CliResult<Value> {
    let owner = gateway.owner(identity)?;
    let documents = gateway.service.list(&owner)?;
    Ok(json!({ "documents": documents }))
}

pub async fn health(gateway: &Gateway) -> CliResult<Value> {
    let report = gateway.health.check().await;
    Ok(json!({
        "report": report,
        "metrics": gateway.service.metrics().snapshot(),
    }))
}

// ==================
// Argument parsing
// ==================

fn read_document(content: &ContentArgs) -> CliResult<NewDocument> {
    let bytes = read_content(&content.file)?;
    let mut document = NewDocument::new(content.content_type.clone(), bytes);
    document.title = content.title.clone();
    Ok(document)
}

/// Build the identity the authentication layer would have verified
pub fn parse_identity(args: &IdentityArgs) -> CliResult<AuthenticatedIdentity> {
    let mut identity = AuthenticatedIdentity::new(args.subject.clone(), args.issuer.clone());

    for claim in &args.claims {
        let (name, value) = claim.split_once('=').ok_or_else(|| {
            CliError::invalid_argument(format!("claim '{}' is not NAME=VALUE", claim))
        })?;
        if name.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "claim '{}' has an empty name",
                claim
            )));
        }
        identity = identity.with_claim(name, Value::String(value.to_string()));
    }

    Ok(identity)
}

fn parse_timestamp(value: &str) -> CliResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::invalid_argument(format!("invalid timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use crate::crypto::KdfConfig;
    use crate::document::DocumentError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::from_json(&format!(
            r#"{{"data_dir": {:?}, "crypto": {{"encryption_passphrase": "secret"}},
                "virus_scan": {{"enabled": false}}}}"#,
            dir.path().display().to_string()
        ))
        .unwrap();
        config.crypto.kdf = KdfConfig::insecure_fast();
        config.validate().unwrap();
        config
    }

    fn identity(subject: &str, claims: &[&str]) -> IdentityArgs {
        IdentityArgs {
            subject: subject.to_string(),
            issuer: "test".to_string(),
            claims: claims.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn content_file(dir: &TempDir, name: &str, body: &[u8]) -> ContentArgs {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        ContentArgs {
            file: path,
            content_type: "text/plain".to_string(),
            title: None,
        }
    }

    #[test]
    fn test_parse_identity() {
        let parsed = parse_identity(&identity("sub-1", &["pid=123", "acr=Level4"])).unwrap();
        assert_eq!(parsed.subject, "sub-1");
        assert_eq!(parsed.string_claim("pid"), Some("123"));
        assert_eq!(parsed.string_claim("acr"), Some("Level4"));

        let err = parse_identity(&identity("sub-1", &["no-equals"])).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_commands_against_local_gateway() {
        let data = TempDir::new().unwrap();
        let inputs = TempDir::new().unwrap();
        let gateway = Gateway::assemble(&config(&data)).unwrap();

        let alice = identity("opaque", &["pid=alice"]);
        let content = content_file(&inputs, "note.txt", b"hello from the cli");

        let uploaded = upload(&gateway, &alice, &content, Some("note-1".into()), None)
            .await
            .unwrap();
        assert_eq!(uploaded["id"], "note-1");
        assert_eq!(uploaded["content_type"], "text/plain");

        let downloaded = download(&gateway, &alice, "note-1", None).await.unwrap();
        let encoded = downloaded["content_base64"].as_str().unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"hello from the cli");

        let out: PathBuf = inputs.path().join("out.txt");
        download(&gateway, &alice, "note-1", Some(&out)).await.unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"hello from the cli");

        let listed = list(&gateway, &alice).unwrap();
        assert_eq!(listed["documents"].as_array().unwrap().len(), 1);

        // Same subject, different personal id: a different owner
        let mallory = identity("opaque", &["pid=mallory"]);
        let err = download(&gateway, &mallory, "note-1", None).await.unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::Document(DocumentError::Forbidden));

        let deleted = delete(&gateway, &alice, "note-1").await.unwrap();
        assert_eq!(deleted["deleted"], true);
        let again = delete(&gateway, &alice, "note-1").await.unwrap();
        assert_eq!(again["deleted"], false);

        let report = health(&gateway).await.unwrap();
        assert_eq!(report["report"]["healthy"], true);
    }

    #[tokio::test]
    async fn test_expiry_requires_custom_id() {
        let data = TempDir::new().unwrap();
        let inputs = TempDir::new().unwrap();
        let gateway = Gateway::assemble(&config(&data)).unwrap();

        let err = upload(
            &gateway,
            &identity("u1", &[]),
            &content_file(&inputs, "a.txt", b"a"),
            None,
            Some("2099-01-01T00:00:00Z".into()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidArgument);
    }
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - docgate upload --config <path> --subject <sub> --file <path> --content-type <type>
//! - docgate update --config <path> --subject <sub> --id <id> --file <path> --content-type <type>
//! - docgate download --config <path> --subject <sub> --id <id> [--out <path>]
//! - docgate delete --config <path> --subject <sub> --id <id>
//! - docgate list --config <path> --subject <sub>
//! - docgate health --config <path>
//! - docgate purge --config <path>
//! - docgate reencrypt --config <path> --id <id>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// docgate - encrypting, scanning, owner-scoped document storage
#[derive(Parser, Debug)]
#[command(name = "docgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Verified caller identity, as the authentication layer would hand it over
#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// `sub` claim of the caller's token
    #[arg(long)]
    pub subject: String,

    /// `iss` claim of the caller's token
    #[arg(long, default_value = "cli")]
    pub issuer: String,

    /// Additional string claims, as name=value
    #[arg(long = "claim", value_name = "NAME=VALUE")]
    pub claims: Vec<String>,
}

/// Content supplied for an upload or update
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// File to read, or `-` for stdin
    #[arg(long)]
    pub file: PathBuf,

    /// Declared MIME type
    #[arg(long)]
    pub content_type: String,

    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a new document
    Upload {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,

        #[command(flatten)]
        content: ContentArgs,

        /// Caller-chosen document id
        #[arg(long)]
        id: Option<String>,

        /// Requested expiry (RFC 3339); only honoured for custom ids when allowed
        #[arg(long)]
        expires_at: Option<String>,
    },

    /// Replace a document's content with a new version
    Update {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,

        #[command(flatten)]
        content: ContentArgs,

        #[arg(long)]
        id: String,
    },

    /// Fetch and decrypt a document
    Download {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,

        #[arg(long)]
        id: String,

        /// Write content here instead of embedding it base64-encoded in the output
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete a document
    Delete {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,

        #[arg(long)]
        id: String,
    },

    /// List the caller's documents
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Probe storage readiness
    Health {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,
    },

    /// Remove expired documents
    Purge {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,
    },

    /// Re-seal a document under the current passphrase
    Reencrypt {
        /// Path to configuration file
        #[arg(long, default_value = "./docgate.json")]
        config: PathBuf,

        #[arg(long)]
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

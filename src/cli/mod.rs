//! CLI module for docgate
//!
//! One document operation per invocation:
//! - upload / update: run the upload pipeline
//! - download / delete / list: owner-scoped access
//! - health: storage readiness
//! - purge / reencrypt: maintenance

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ContentArgs, IdentityArgs};
pub use commands::{parse_identity, run, run_command, Gateway};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};

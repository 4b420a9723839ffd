//! docgate CLI entry point
//!
//! Parses arguments, runs one command, and exits non-zero on failure.
//! All logic is delegated to the CLI module.

use docgate::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}

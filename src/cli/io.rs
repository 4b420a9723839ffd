//! JSON I/O handling for CLI
//!
//! - Output: single JSON object on stdout
//! - Errors: single JSON object on stderr
//! - Document content: file path or `-` for stdin

use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read document content from a file, or stdin for `-`
pub fn read_content(path: &Path) -> CliResult<Vec<u8>> {
    if path == Path::new("-") {
        let mut content = Vec::new();
        io::stdin().lock().read_to_end(&mut content)?;
        return Ok(content);
    }

    std::fs::read(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stderr
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stderr = io::stderr();
    serde_json::to_writer(&mut stderr, &response)?;
    writeln!(stderr)?;
    stderr.flush()?;

    Ok(())
}

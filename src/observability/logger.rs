//! JSON line logger for document events
//!
//! Every line is one [`Event`]: `event` first, `severity` second, then the
//! event's fields in key order. Lines go to stderr; stdout belongs to command
//! output.

use std::fmt;
use std::io::{self, Write};

use serde_json::Value;

use super::events::Event;

/// How loudly an event is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal document traffic
    Info,
    /// Refused requests, stray blobs, legacy keys
    Warn,
    /// Broken collaborators or damaged documents
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes document events as JSON lines
pub struct Logger;

impl Logger {
    /// Log `event` at its own severity
    pub fn emit(event: Event, fields: &[(&str, &str)]) {
        Self::emit_to(event, fields, &mut io::stderr().lock());
    }

    fn emit_to<W: Write>(event: Event, fields: &[(&str, &str)], writer: &mut W) {
        let line = render(event, fields);

        // Logging never fails the operation that logs
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn render(event: Event, fields: &[(&str, &str)]) -> String {
    let mut ordered: Vec<&(&str, &str)> = fields.iter().collect();
    ordered.sort_by_key(|(key, _)| *key);

    let mut line = format!(
        "{{\"event\":\"{}\",\"severity\":\"{}\"",
        event.as_str(),
        event.severity()
    );
    for (key, value) in ordered {
        line.push(',');
        line.push_str(&quoted(key));
        line.push(':');
        line.push_str(&quoted(value));
    }
    line.push_str("}\n");
    line
}

fn quoted(text: &str) -> String {
    Value::from(text).to_string()
}

#[cfg(test)]
pub fn capture_log(event: Event, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::emit_to(event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_carries_event_and_its_severity() {
        let output = capture_log(Event::DocumentCorrupted, &[("document_id", "doc-1")]);

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "DOCUMENT_CORRUPTED");
        assert_eq!(parsed["severity"], "ERROR");
        assert_eq!(parsed["document_id"], "doc-1");
    }

    #[test]
    fn test_fields_are_sorted_after_event_and_severity() {
        let output = capture_log(
            Event::UploadRejected,
            &[("stage", "validating"), ("document_id", "d"), ("reason", "r")],
        );

        let keys = ["event", "severity", "document_id", "reason", "stage"];
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| output.find(&format!("\"{}\"", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", output);

        let reordered = capture_log(
            Event::UploadRejected,
            &[("reason", "r"), ("stage", "validating"), ("document_id", "d")],
        );
        assert_eq!(output, reordered);
    }

    #[test]
    fn test_values_are_escaped() {
        let reason = "quote \" backslash \\ newline \n control \u{1}";
        let output = capture_log(Event::StorageUnavailable, &[("reason", reason)]);

        assert_eq!(output.matches('\n').count(), 1);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["reason"], reason);
    }
}

//! Observability subsystem for docgate
//!
//! - Structured logging (JSON, one line per event, on stderr)
//! - Typed lifecycle events
//! - Pipeline counters
//!
//! # Usage
//!
//! ```ignore
//! use docgate::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::DocumentUploaded, &[("document_id", "0190...")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_upload(1024);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::emit(event, fields);
}

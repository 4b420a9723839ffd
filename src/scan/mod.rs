//! # docgate Scan Module
//!
//! Virus-scan gate in front of persistence. Fails closed.

pub mod errors;
pub mod gate;
pub mod http;

pub use errors::{ScanError, ScanResult};
pub use gate::{ScanGate, ScanVerdict, VirusScanner};
pub use http::HttpVirusScanner;

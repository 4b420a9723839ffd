//! # HTTP Scan Client
//!
//! Talks to a ClamAV-REST style provider: `PUT {url}` with the raw bytes, answered by
//! `[{"Filename": "...", "Result": "OK"}]`. Any `FOUND` result means infected.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::errors::{ScanError, ScanResult};
use super::gate::{ScanVerdict, VirusScanner};

#[derive(Debug, Deserialize)]
struct ScanReport {
    #[serde(rename = "Filename", default)]
    _filename: Option<String>,
    #[serde(rename = "Result")]
    result: String,
}

/// Scan provider reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpVirusScanner {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpVirusScanner {
    /// `timeout` bounds the whole request, including reading the body
    pub fn new(url: impl Into<String>, timeout: Duration) -> ScanResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScanError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Turn the provider's report list into a verdict
fn verdict_from_reports(reports: &[ScanReport]) -> ScanResult<ScanVerdict> {
    if reports.is_empty() {
        return Err(ScanError::InvalidResponse("empty scan report".to_string()));
    }

    let mut verdict = ScanVerdict::Clean;
    for report in reports {
        match report.result.trim().to_ascii_uppercase().as_str() {
            "OK" => {}
            "FOUND" => verdict = ScanVerdict::Infected,
            other => {
                return Err(ScanError::InvalidResponse(format!(
                    "unknown scan result '{}'",
                    other
                )))
            }
        }
    }

    Ok(verdict)
}

#[async_trait]
impl VirusScanner for HttpVirusScanner {
    async fn scan(&self, content: &[u8]) -> ScanResult<ScanVerdict> {
        let response = self
            .client
            .put(&self.url)
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScanError::Timeout(self.timeout)
                } else {
                    ScanError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::BadStatus(status.as_u16()));
        }

        let reports: Vec<ScanReport> = response
            .json()
            .await
            .map_err(|e| ScanError::InvalidResponse(e.to_string()))?;

        verdict_from_reports(&reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reports(json: &str) -> Vec<ScanReport> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_all_ok_is_clean() {
        let parsed = reports(r#"[{"Filename": "a.pdf", "Result": "OK"}]"#);
        assert_eq!(verdict_from_reports(&parsed), Ok(ScanVerdict::Clean));
    }

    #[test]
    fn test_any_found_is_infected() {
        let parsed = reports(
            r#"[{"Filename": "a", "Result": "ok"}, {"Filename": "b", "Result": "FOUND"}]"#,
        );
        assert_eq!(verdict_from_reports(&parsed), Ok(ScanVerdict::Infected));
    }

    #[test]
    fn test_empty_or_unknown_is_an_error() {
        assert!(verdict_from_reports(&[]).is_err());

        let parsed = reports(r#"[{"Result": "ERROR"}]"#);
        assert!(matches!(
            verdict_from_reports(&parsed),
            Err(ScanError::InvalidResponse(_))
        ));
    }
}

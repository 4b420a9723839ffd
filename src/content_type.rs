//! # Content Type Checks
//!
//! Sniffs the real type of an upload from its leading bytes and decides whether the
//! caller's declared type is believable.
//!
//! ## Invariants
//! - The detected type is computed from bytes only, never from caller metadata
//! - All checks happen before any scan or storage call

use crate::document::errors::{DocumentError, DocumentResult};

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";
pub const JSON: &str = "application/json";
pub const PDF: &str = "application/pdf";
pub const PNG: &str = "image/png";
pub const JPEG: &str = "image/jpeg";
pub const APPLICATION_XML: &str = "application/xml";
pub const TEXT_XML: &str = "text/xml";

const DEFAULT_SUPPORTED: &[&str] = &[
    PDF,
    PNG,
    JPEG,
    JSON,
    APPLICATION_XML,
    TEXT_XML,
    TEXT_PLAIN,
    OCTET_STREAM,
];

/// Declared/detected content type checks
#[derive(Debug, Clone)]
pub struct ContentTypeService {
    supported: Vec<String>,
}

impl Default for ContentTypeService {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTypeService {
    /// Service accepting the default set of document types
    pub fn new() -> Self {
        Self::with_supported(DEFAULT_SUPPORTED.iter().copied())
    }

    /// Service accepting exactly `types` as declared content types
    pub fn with_supported<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            supported: types.into_iter().map(|t| normalize(t.as_ref())).collect(),
        }
    }

    /// Sniff the content type from magic numbers.
    ///
    /// Unknown signatures fall back to `text/plain` for valid UTF-8 and
    /// `application/octet-stream` for everything else.
    pub fn detect(&self, content: &[u8]) -> String {
        if let Some(kind) = infer::get(content) {
            return normalize(kind.mime_type());
        }

        if std::str::from_utf8(content).is_ok() {
            TEXT_PLAIN.to_string()
        } else {
            OCTET_STREAM.to_string()
        }
    }

    /// Whether `declared` is on the allowlist
    pub fn is_supported(&self, declared: &str) -> bool {
        let declared = normalize(declared);
        self.supported.iter().any(|s| *s == declared)
    }

    /// Whether a declared type is compatible with a detected one
    pub fn validate(&self, declared: &str, detected: &str) -> bool {
        let declared = normalize(declared);
        let detected = normalize(detected);

        if declared == detected || declared == OCTET_STREAM {
            return true;
        }

        match declared.as_str() {
            APPLICATION_XML | TEXT_XML => {
                matches!(detected.as_str(), APPLICATION_XML | TEXT_XML | TEXT_PLAIN)
            }
            JSON => detected == TEXT_PLAIN,
            d if d.starts_with("text/") => detected == TEXT_PLAIN,
            _ => false,
        }
    }

    /// Full upload pre-condition. Returns the detected content type.
    pub fn check(&self, declared: &str, content: &[u8]) -> DocumentResult<String> {
        if !self.is_supported(declared) {
            return Err(DocumentError::UnsupportedContentType(declared.to_string()));
        }

        let detected = self.detect(content);
        let mismatch = || DocumentError::ContentTypeMismatch {
            declared: normalize(declared),
            detected: detected.clone(),
        };

        if !self.validate(declared, &detected) {
            return Err(mismatch());
        }

        if normalize(declared) == JSON
            && serde_json::from_slice::<serde_json::Value>(content).is_err()
        {
            return Err(mismatch());
        }

        Ok(detected)
    }
}

/// Lowercase, drop parameters, fold known aliases
pub fn normalize(content_type: &str) -> String {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => JPEG.to_string(),
        _ => essence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_BYTES: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n";
    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01";
    const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01\x01\x00\x00\x01";

    #[test]
    fn test_detect_by_signature() {
        let service = ContentTypeService::new();
        assert_eq!(service.detect(PDF_BYTES), PDF);
        assert_eq!(service.detect(PNG_BYTES), PNG);
        assert_eq!(service.detect(JPEG_BYTES), JPEG);
        assert_eq!(service.detect(b"just some words"), TEXT_PLAIN);
        assert_eq!(service.detect(&[0x00, 0xff, 0xfe, 0x80]), OCTET_STREAM);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Application/PDF; charset=binary"), PDF);
        assert_eq!(normalize(" image/jpg "), JPEG);
    }

    #[test]
    fn test_validate_exact_and_generic() {
        let service = ContentTypeService::new();
        assert!(service.validate(PDF, PDF));
        assert!(service.validate("image/JPG", JPEG));
        assert!(service.validate(OCTET_STREAM, PNG));
        assert!(service.validate(JSON, TEXT_PLAIN));
        assert!(service.validate(APPLICATION_XML, TEXT_XML));
        assert!(!service.validate(PNG, JPEG));
        assert!(!service.validate(PDF, TEXT_PLAIN));
        assert!(!service.validate(TEXT_PLAIN, PDF));
    }

    #[test]
    fn test_check_rejects_spoofed_png() {
        let service = ContentTypeService::new();
        let err = service.check(PNG, JPEG_BYTES).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::ContentTypeMismatch { ref declared, ref detected }
                if declared == PNG && detected == JPEG
        ));
    }

    #[test]
    fn test_check_json_must_parse() {
        let service = ContentTypeService::new();
        assert_eq!(service.check(JSON, br#"{"a": 1}"#).unwrap(), TEXT_PLAIN);
        assert!(matches!(
            service.check(JSON, b"not json at all"),
            Err(DocumentError::ContentTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_check_unsupported_declared_type() {
        let service = ContentTypeService::new();
        assert!(matches!(
            service.check("application/x-msdownload", b"MZ\x90\x00"),
            Err(DocumentError::UnsupportedContentType(_))
        ));
    }

    #[test]
    fn test_custom_allowlist() {
        let service = ContentTypeService::with_supported(["application/pdf"]);
        assert!(service.is_supported("application/pdf; charset=binary"));
        assert!(!service.is_supported(PNG));
    }
}

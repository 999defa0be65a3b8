//! Cardsmith Ingest
//!
//! Turns uploaded documents into plain text for flashcard generation.
//!
//! | MIME type         | Extractor                          |
//! |-------------------|------------------------------------|
//! | `image/*`         | OCR via the `tesseract` executable |
//! | `application/pdf` | `pdf-extract`                      |
//! | `text/plain`      | UTF-8 decode                       |
//!
//! Anything else fails with [`IngestError::UnsupportedFormat`]. In a batch,
//! a failing file is reported and skipped; the other files still contribute.
//!
//! # Example
//!
//! ```
//! use cardsmith_ingest::extract_text;
//!
//! let text = extract_text(b"The sky is blue.", "text/plain").unwrap();
//! assert_eq!(text, "The sky is blue.");
//! ```

#![warn(missing_docs)]

mod batch;
mod error;
mod ocr;

pub use batch::{extract_batch, BatchExtraction, ExtractedDocument, FileFailure, InputFile};
pub use error::IngestError;
pub use ocr::OcrConfig;

use std::path::Path;
use tracing::{debug, warn};

/// Supported document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Raster image, read with OCR
    Image,
    /// PDF with a text layer
    Pdf,
    /// UTF-8 text
    PlainText,
}

impl DocumentKind {
    /// Classify a declared MIME type
    pub fn from_mime(mime: &str) -> Result<Self, IngestError> {
        // Parameters such as "; charset=utf-8" do not affect the choice
        let essence = mime
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Ok(DocumentKind::Image)
        } else if essence == "application/pdf" {
            Ok(DocumentKind::Pdf)
        } else if essence == "text/plain" {
            Ok(DocumentKind::PlainText)
        } else {
            Err(IngestError::UnsupportedFormat(mime.to_string()))
        }
    }
}

/// Guess a MIME type from a file name's extension
///
/// Unknown extensions map to `application/octet-stream`, which no extractor
/// accepts.
pub fn mime_for_path(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Extracts text using a configurable OCR tool
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    ocr: OcrConfig,
}

impl TextExtractor {
    /// Create an extractor with a specific OCR configuration
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }

    /// Extract text from raw bytes with a declared MIME type
    pub fn extract_text(&self, data: &[u8], mime: &str) -> Result<String, IngestError> {
        let kind = DocumentKind::from_mime(mime)?;
        debug!("Extracting {} bytes as {:?}", data.len(), kind);

        match kind {
            DocumentKind::Image => self.ocr.recognize(data),
            DocumentKind::Pdf => extract_pdf(data),
            DocumentKind::PlainText => decode_text(data),
        }
    }
}

/// Extract text with the default OCR configuration
pub fn extract_text(data: &[u8], mime: &str) -> Result<String, IngestError> {
    TextExtractor::default().extract_text(data, mime)
}

/// pdf-extract panics on some malformed documents, so it runs on its own
/// thread and a panic becomes [`IngestError::Pdf`] for this file only.
fn extract_pdf(data: &[u8]) -> Result<String, IngestError> {
    let data = data.to_vec();
    on_worker_thread(move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| IngestError::Pdf(e.to_string()))
    })
}

fn on_worker_thread<F>(f: F) -> Result<String, IngestError>
where
    F: FnOnce() -> Result<String, IngestError> + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name("pdf-extract".to_string())
        .spawn(f)?;

    handle.join().map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown error".to_string());
        warn!("PDF extractor panicked: {}", reason);
        IngestError::Pdf(format!("extractor crashed: {}", reason))
    })?
}

fn decode_text(data: &[u8]) -> Result<String, IngestError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    String::from_utf8(data.to_vec()).map_err(|e| IngestError::InvalidEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("image/png").unwrap(), DocumentKind::Image);
        assert_eq!(DocumentKind::from_mime("image/jpeg").unwrap(), DocumentKind::Image);
        assert_eq!(DocumentKind::from_mime("application/pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime("text/plain").unwrap(), DocumentKind::PlainText);
        assert_eq!(
            DocumentKind::from_mime("Text/Plain; charset=utf-8").unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_unsupported_mime() {
        let result = DocumentKind::from_mime("application/zip");
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(m)) if m == "application/zip"));
        assert!(DocumentKind::from_mime("text/html").is_err());
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path("notes.txt"), "text/plain");
        assert_eq!(mime_for_path("paper.pdf"), "application/pdf");
        assert_eq!(mime_for_path("scan.PNG"), "image/png");
        assert_eq!(mime_for_path("photo.jpg"), "image/jpeg");
        assert_eq!(mime_for_path("blob.unknownext"), "application/octet-stream");
    }

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text("Grass is green.".as_bytes(), "text/plain").unwrap();
        assert_eq!(text, "Grass is green.");
    }

    #[test]
    fn test_extract_plain_text_strips_bom() {
        let text = extract_text(b"\xEF\xBB\xBFhello", "text/plain").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_extract_invalid_utf8() {
        let result = extract_text(&[0xff, 0xfe, 0x00], "text/plain");
        assert!(matches!(result, Err(IngestError::InvalidEncoding(_))));
    }

    #[test]
    fn test_extract_unsupported() {
        let result = extract_text(b"PK\x03\x04", "application/zip");
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extract_broken_pdf() {
        let result = extract_text(b"definitely not a pdf", "application/pdf");
        assert!(matches!(result, Err(IngestError::Pdf(_))));
    }

    #[test]
    fn test_worker_panic_becomes_pdf_error() {
        let result = on_worker_thread(|| panic!("bad xref table"));
        match result {
            Err(IngestError::Pdf(reason)) => assert!(reason.contains("bad xref table")),
            other => panic!("expected a PDF error, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_passes_result_through() {
        let text = on_worker_thread(|| Ok("page one".to_string())).unwrap();
        assert_eq!(text, "page one");
    }

    #[test]
    fn test_extract_truncated_pdf() {
        let result = extract_text(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog", "application/pdf");
        assert!(matches!(result, Err(IngestError::Pdf(_))));
    }
}

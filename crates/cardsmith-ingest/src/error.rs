//! Error types for text extraction

use thiserror::Error;

/// Errors that can occur while extracting text from a document
#[derive(Error, Debug)]
pub enum IngestError {
    /// The declared MIME type has no extractor
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Plain text that is not valid UTF-8
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// PDF could not be read
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// OCR tool failed or is missing
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

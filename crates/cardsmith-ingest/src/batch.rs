//! Multi-file extraction with per-file failure isolation

use crate::{mime_for_path, IngestError, TextExtractor};
use std::path::Path;
use tracing::{info, warn};

/// One uploaded file
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Display name (usually the file name)
    pub name: String,
    /// Declared MIME type
    pub mime: String,
    /// Raw file contents
    pub data: Vec<u8>,
}

impl InputFile {
    /// Read a file from disk, guessing its MIME type from the extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            mime: mime_for_path(path),
            data: std::fs::read(path)?,
        })
    }
}

/// A file whose text was extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// File name
    pub name: String,
    /// Number of characters extracted
    pub chars: usize,
    /// Whether the extracted text has any non-whitespace content
    pub has_text: bool,
}

/// A file that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// File name
    pub name: String,
    /// Why extraction failed
    pub reason: String,
}

/// Combined result of a batch extraction
#[derive(Debug, Clone, Default)]
pub struct BatchExtraction {
    /// Concatenated text, each file introduced by a header line
    pub text: String,
    /// Files that contributed text, in input order
    pub documents: Vec<ExtractedDocument>,
    /// Files that failed, in input order
    pub failures: Vec<FileFailure>,
}

impl BatchExtraction {
    /// Whether no text at all was extracted
    pub fn is_blank(&self) -> bool {
        !self.documents.iter().any(|d| d.has_text)
    }
}

/// Extract and concatenate the text of several files
///
/// A file that fails is recorded in [`BatchExtraction::failures`] and does
/// not stop the rest of the batch.
pub fn extract_batch(extractor: &TextExtractor, files: &[InputFile]) -> BatchExtraction {
    let mut batch = BatchExtraction::default();

    for file in files {
        match extractor.extract_text(&file.data, &file.mime) {
            Ok(text) => {
                info!("Extracted {} chars from '{}'", text.chars().count(), file.name);
                batch.text.push_str(&format!("\n\n--- Text from {} ---\n\n", file.name));
                batch.text.push_str(&text);
                batch.documents.push(ExtractedDocument {
                    name: file.name.clone(),
                    chars: text.chars().count(),
                    has_text: !text.trim().is_empty(),
                });
            }
            Err(e) => {
                warn!("Error processing {}: {}", file.name, e);
                batch.failures.push(FileFailure {
                    name: file.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text_file(name: &str, text: &str) -> InputFile {
        InputFile {
            name: name.to_string(),
            mime: "text/plain".to_string(),
            data: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_batch_concatenates_with_headers() {
        let files = vec![text_file("a.txt", "Alpha"), text_file("b.txt", "Beta")];
        let batch = extract_batch(&TextExtractor::default(), &files);

        assert_eq!(
            batch.text,
            "\n\n--- Text from a.txt ---\n\nAlpha\n\n--- Text from b.txt ---\n\nBeta"
        );
        assert_eq!(batch.documents.len(), 2);
        assert!(batch.failures.is_empty());
        assert!(!batch.is_blank());
    }

    #[test]
    fn test_batch_isolates_unsupported_file() {
        let files = vec![
            text_file("a.txt", "Alpha"),
            InputFile {
                name: "archive.zip".to_string(),
                mime: "application/zip".to_string(),
                data: vec![0x50, 0x4b],
            },
            text_file("c.txt", "Gamma"),
        ];
        let batch = extract_batch(&TextExtractor::default(), &files);

        assert_eq!(batch.documents.len(), 2);
        assert_eq!(batch.documents[1].name, "c.txt");
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].name, "archive.zip");
        assert!(batch.failures[0].reason.contains("Unsupported format"));
        assert!(batch.text.contains("Gamma"));
    }

    #[test]
    fn test_batch_isolates_broken_pdf() {
        let files = vec![
            text_file("a.txt", "Alpha"),
            InputFile {
                name: "scan.pdf".to_string(),
                mime: "application/pdf".to_string(),
                data: b"%PDF-1.7\n%garbage without a trailer".to_vec(),
            },
            text_file("c.txt", "Gamma"),
        ];
        let batch = extract_batch(&TextExtractor::default(), &files);

        let names: Vec<_> = batch.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "c.txt"]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].name, "scan.pdf");
        assert!(batch.failures[0].reason.starts_with("PDF extraction failed"));
        assert!(batch.text.contains("Alpha") && batch.text.contains("Gamma"));
    }

    #[test]
    fn test_batch_all_failed_is_blank() {
        let files = vec![InputFile {
            name: "x.bin".to_string(),
            mime: "application/octet-stream".to_string(),
            data: vec![1, 2, 3],
        }];
        let batch = extract_batch(&TextExtractor::default(), &files);
        assert!(batch.is_blank());
    }

    #[test]
    fn test_batch_whitespace_only_is_blank() {
        let batch = extract_batch(&TextExtractor::default(), &[text_file("blank.txt", "  \n ")]);
        assert!(batch.is_blank());
    }

    #[test]
    fn test_input_file_from_path() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "hello").unwrap();

        let input = InputFile::from_path(file.path()).unwrap();
        assert_eq!(input.mime, "text/plain");
        assert_eq!(input.data, b"hello");
        assert!(input.name.ends_with(".txt"));
    }
}

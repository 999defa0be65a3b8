//! OCR through the external `tesseract` executable

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// How to run the OCR tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Executable name or path
    pub command: String,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

impl OcrConfig {
    /// Recognize text in an encoded image (PNG, JPEG, ...)
    pub fn recognize(&self, image: &[u8]) -> Result<String, IngestError> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                IngestError::Ocr(format!(
                    "could not start '{}' ({}); install tesseract-ocr",
                    self.command, e
                ))
            })?;

        // Tesseract reads the whole image before writing anything. It may also
        // quit early (missing language data), so a failed write is only
        // reported after its exit status and stderr are known.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(image),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngestError::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        if let Err(e) = written {
            return Err(IngestError::Ocr(format!(
                "{} did not read the image: {}",
                self.command, e
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR produced {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OcrConfig::default();
        assert_eq!(config.command, "tesseract");
        assert_eq!(config.language, "eng");
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let config = OcrConfig {
            command: "cardsmith-no-such-ocr-tool".to_string(),
            language: "eng".to_string(),
        };
        let result = config.recognize(b"not an image");
        assert!(matches!(result, Err(IngestError::Ocr(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_exiting_before_reading_input() {
        // `false` exits at once without touching stdin; the image is larger
        // than a pipe buffer so the write hits a closed pipe
        let config = OcrConfig {
            command: "false".to_string(),
            language: "eng".to_string(),
        };
        let image = vec![0u8; 1 << 20];

        let result = config.recognize(&image);
        match result {
            Err(IngestError::Ocr(reason)) => assert!(reason.starts_with("false exited with")),
            other => panic!("expected an OCR error, got {:?}", other),
        }
    }
}

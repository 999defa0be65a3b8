//! Error types for the generator

use crate::types::GenerationResult;
use thiserror::Error;

/// Errors that end a generation run
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Input text is empty or whitespace-only
    #[error("No text to generate flashcards from")]
    EmptyInput,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// The engine failed; flashcards from earlier chunks are kept in `partial`
    #[error("Engine error on chunk {chunk_index}: {message}")]
    Engine {
        /// 1-based index of the failing chunk
        chunk_index: usize,
        /// Engine error message
        message: String,
        /// Result accumulated before the failure
        partial: Box<GenerationResult>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeneratorError {
    /// Flashcards generated before the run failed, if any survive
    pub fn partial(&self) -> Option<&GenerationResult> {
        match self {
            GeneratorError::Engine { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

//! Cardsmith Generator
//!
//! Turns study text into question/answer flashcards using a local LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → Chunker → PromptBuilder → InferenceEngine → Parser → FlashcardGenerator
//! ```
//!
//! The text is cut into fixed-size chunks. Each chunk is wrapped in the
//! generation instructions and the model's chat template, sent to the engine
//! in one blocking call, and the reply is scanned for a JSON array of
//! `{"question", "answer"}` objects. A chunk whose reply cannot be parsed is
//! logged and skipped; the other chunks still contribute.
//!
//! # Example Usage
//!
//! ```
//! use cardsmith_generator::{FlashcardGenerator, GeneratorConfig};
//! use cardsmith_llm::MockEngine;
//!
//! let engine = MockEngine::new(r#"[{"question": "What color is the sky?", "answer": "Blue"}]"#);
//! let generator = FlashcardGenerator::new(engine, GeneratorConfig::default()).unwrap();
//!
//! let result = generator.generate("The sky is blue.").unwrap();
//! assert_eq!(result.flashcards.len(), 1);
//! assert_eq!(result.flashcards[0].answer, "Blue");
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod generator;
mod parser;
mod prompt;
mod types;


pub use chunking::{chunk_text, Chunks, TextChunker};
pub use config::GeneratorConfig;
pub use error::GeneratorError;
pub use generator::{normalize_whitespace, FlashcardGenerator};
pub use parser::{parse_flashcards, ParseFailure, ParsedChunk};
pub use prompt::{ChatTemplate, PromptBuilder};
pub use types::{ChunkFailure, GenerationMetadata, GenerationProgress, GenerationResult};

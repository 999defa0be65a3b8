//! Core generator implementation

use crate::chunking::TextChunker;
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::parser::parse_flashcards;
use crate::prompt::PromptBuilder;
use crate::types::{ChunkFailure, GenerationMetadata, GenerationProgress, GenerationResult};
use cardsmith_domain::traits::InferenceEngine;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns study text into flashcards, one chunk at a time
pub struct FlashcardGenerator<E>
where
    E: InferenceEngine,
{
    engine: E,
    config: GeneratorConfig,
    prompt_builder: PromptBuilder,
    abort: Option<Arc<AtomicBool>>,
}

impl<E> FlashcardGenerator<E>
where
    E: InferenceEngine,
    E::Error: std::fmt::Display,
{
    /// Create a new generator
    pub fn new(engine: E, config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate().map_err(GeneratorError::Config)?;
        let prompt_builder = PromptBuilder::new(config.template.clone());

        Ok(Self {
            engine,
            config,
            prompt_builder,
            abort: None,
        })
    }

    /// Stop between chunks once `flag` is set
    pub fn with_abort_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    /// The underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Generate flashcards from text
    pub fn generate(&self, text: &str) -> Result<GenerationResult, GeneratorError> {
        self.generate_with_progress(text, |_| {})
    }

    /// Generate flashcards, reporting progress after each chunk
    ///
    /// Chunks are processed in source order. A chunk whose output cannot be
    /// parsed is recorded in [`GenerationResult::failures`] and skipped. An
    /// engine error ends the run with [`GeneratorError::Engine`], which carries
    /// everything accumulated so far.
    pub fn generate_with_progress<F>(
        &self,
        text: &str,
        mut on_progress: F,
    ) -> Result<GenerationResult, GeneratorError>
    where
        F: FnMut(GenerationProgress),
    {
        let start_time = Instant::now();

        let text_length = text.chars().count();
        if text_length > self.config.max_text_length {
            return Err(GeneratorError::TextTooLong(
                text_length,
                self.config.max_text_length,
            ));
        }

        let normalized;
        let text = if self.config.normalize_whitespace {
            normalized = normalize_whitespace(text);
            normalized.as_str()
        } else {
            text
        };

        let chunker = TextChunker::new(self.config.max_chunk_size);
        let chunks_total = chunker.count(text);
        if chunks_total == 0 {
            return Err(GeneratorError::EmptyInput);
        }

        info!(
            "Generating flashcards from {} chars in {} chunks",
            text_length, chunks_total
        );

        let params = self.config.invocation_params();
        let mut result = GenerationResult {
            metadata: GenerationMetadata {
                model_name: self.engine.model_name().to_string(),
                chunks_total,
                ..GenerationMetadata::default()
            },
            ..GenerationResult::default()
        };
        let mut seen_questions = HashSet::new();

        for (idx, chunk) in chunker.chunk(text).enumerate() {
            let chunk_index = idx + 1;

            if self.abort_requested() {
                info!("Generation aborted before chunk {}/{}", chunk_index, chunks_total);
                result.metadata.aborted = true;
                break;
            }

            debug!("Processing chunk {}/{}", chunk_index, chunks_total);
            let prompt = self.prompt_builder.build(chunk);

            let response = match self.engine.invoke(&prompt, &params) {
                Ok(response) => response,
                Err(e) => {
                    result.metadata.processing_time_ms = elapsed_ms(start_time);
                    return Err(GeneratorError::Engine {
                        chunk_index,
                        message: e.to_string(),
                        partial: Box::new(result),
                    });
                }
            };
            result.metadata.chunks_processed += 1;

            debug!("Chunk {} response length: {} chars", chunk_index, response.len());

            match parse_flashcards(&response) {
                Ok(parsed) => {
                    result.metadata.entries_dropped += parsed.dropped;
                    for card in parsed.flashcards {
                        if self.config.deduplicate && !seen_questions.insert(card.question_key()) {
                            debug!("Skipping repeated question: {}", card.question);
                            result.metadata.duplicates_removed += 1;
                            continue;
                        }
                        result.flashcards.push(card);
                    }
                }
                Err(e) => {
                    warn!("Error parsing JSON for chunk {}: {}", chunk_index, e);
                    result.failures.push(ChunkFailure {
                        chunk_index,
                        reason: e.to_string(),
                    });
                }
            }

            on_progress(GenerationProgress {
                chunks_processed: result.metadata.chunks_processed,
                chunks_total,
                flashcards_so_far: result.flashcards.len(),
            });
        }

        result.metadata.processing_time_ms = elapsed_ms(start_time);

        info!(
            "Generation complete: {} flashcards, {} failed chunks, {} dropped entries",
            result.flashcards.len(),
            result.failures.len(),
            result.metadata.entries_dropped
        );

        Ok(result)
    }

    fn abort_requested(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Collapse every run of whitespace to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

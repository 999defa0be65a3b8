//! Result and progress types for flashcard generation

use cardsmith_domain::Flashcard;

/// Result of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    /// Flashcards in chunk order, then array order
    pub flashcards: Vec<Flashcard>,

    /// Chunks whose output could not be parsed
    pub failures: Vec<ChunkFailure>,

    /// Metadata about the run
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    /// Whether any flashcards were produced
    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }
}

/// A chunk whose output yielded no flashcards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// 1-based chunk index
    pub chunk_index: usize,

    /// Why parsing failed
    pub reason: String,
}

/// Metadata about a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationMetadata {
    /// Name of the model used
    pub model_name: String,

    /// Number of chunks the text was split into
    pub chunks_total: usize,

    /// Number of chunks sent to the engine
    pub chunks_processed: usize,

    /// Array entries dropped as malformed, across all chunks
    pub entries_dropped: usize,

    /// Flashcards dropped as repeats of an earlier question
    pub duplicates_removed: usize,

    /// Whether the run was stopped early by the abort flag
    pub aborted: bool,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Progress report delivered after each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProgress {
    /// Chunks finished so far
    pub chunks_processed: usize,

    /// Total chunks in this run
    pub chunks_total: usize,

    /// Flashcards accumulated so far
    pub flashcards_so_far: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_result_is_empty() {
        let result = GenerationResult::default();
        assert!(result.is_empty());
        assert!(!result.metadata.aborted);
    }
}

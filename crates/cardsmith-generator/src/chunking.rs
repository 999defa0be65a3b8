//! Fixed-size text chunking
//!
//! Text is sliced at fixed character offsets with no overlap and no
//! sentence or word awareness. Offsets count Unicode scalar values, so a
//! chunk never splits a code point.

/// Splits text into bounded chunks
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_chunk_size: usize,
}

impl TextChunker {
    /// Create a chunker producing chunks of at most `max_chunk_size` chars
    ///
    /// A size of zero is treated as one.
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    /// Lazily chunk the given text
    ///
    /// Blank input yields no chunks. The iterator is `Clone`, and calling
    /// `chunk` again restarts from the beginning.
    pub fn chunk<'a>(&self, text: &'a str) -> Chunks<'a> {
        let rest = if text.trim().is_empty() { "" } else { text };
        Chunks {
            rest,
            max_chunk_size: self.max_chunk_size,
        }
    }

    /// Number of chunks `chunk` will produce, without slicing
    pub fn count(&self, text: &str) -> usize {
        if text.trim().is_empty() {
            return 0;
        }
        text.chars().count().div_ceil(self.max_chunk_size)
    }
}

/// Iterator over consecutive chunks of a text
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    max_chunk_size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let end = self
            .rest
            .char_indices()
            .nth(self.max_chunk_size)
            .map(|(idx, _)| idx)
            .unwrap_or(self.rest.len());

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}

/// Chunk text with the given maximum size
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Chunks<'_> {
    TextChunker::new(max_chunk_size).chunk(text)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// ceil(L/C) chunks, each at most C chars, concatenating to the input
        #[test]
        fn test_chunking_partitions_text(text in "\\PC{0,400}", size in 1usize..64) {
            let chunks: Vec<&str> = chunk_text(&text, size).collect();

            if text.trim().is_empty() {
                prop_assert!(chunks.is_empty());
            } else {
                let len = text.chars().count();
                prop_assert_eq!(chunks.len(), len.div_ceil(size));
                prop_assert_eq!(chunks.concat(), text.clone());
                for chunk in &chunks {
                    prop_assert!(chunk.chars().count() <= size);
                    prop_assert!(!chunk.is_empty());
                }
            }
            prop_assert_eq!(TextChunker::new(size).count(&text), chunks.len());
        }
    }
}

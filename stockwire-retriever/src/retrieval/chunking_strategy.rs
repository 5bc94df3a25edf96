use super::document::Document;
use crate::config::DEFAULT_CHUNK_SIZE;
use stockwire_context::{TermFrequencies, chunk_terms, term_frequencies, tokenize};

/// A chunk ready to be appended to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedChunk {
    /// Space-joined terms of the window
    pub text: String,
    /// Counts derived from `text` itself
    pub term_frequencies: TermFrequencies,
}

/// Strategy for turning documents into term-window chunks
#[derive(Debug, Clone, Copy)]
pub struct ChunkingStrategy {
    chunk_size: usize,
}

impl Default for ChunkingStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkingStrategy {
    /// Create a strategy producing chunks of at most `chunk_size` terms
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk one document. A document without terms yields no chunks.
    pub fn chunk_document(&self, document: &Document) -> Vec<PreparedChunk> {
        let terms = tokenize(&document.base_text());
        let chunks: Vec<PreparedChunk> = chunk_terms(&terms, self.chunk_size)
            .into_iter()
            .map(|window| {
                let text = window.text();
                // Count from the stored text, not the window, so a reload agrees.
                let term_frequencies = term_frequencies(&tokenize(&text));
                PreparedChunk {
                    text,
                    term_frequencies,
                }
            })
            .collect();

        tracing::trace!(
            "Chunked document with {} terms into {} chunks (max size: {})",
            terms.len(),
            chunks.len(),
            self.chunk_size
        );

        chunks
    }
}

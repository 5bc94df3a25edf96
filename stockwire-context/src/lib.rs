pub mod text;

// Re-export the tokenizer surface for external use
pub use text::{TermFrequencies, TermWindow, chunk_terms, term_frequencies, tokenize};

//! stockwire-retriever: per-symbol lexical retrieval over news snippets
//!
//! Short documents (headline plus summary) are tokenized, split into windows of
//! at most `chunk_size` terms, and stored with a term-frequency table per chunk.
//! Queries are ranked against one symbol's chunks with a TF-IDF cosine score.
//!
//! ## Key Modules
//!
//! - **[`retrieval`]**: documents, chunking, the indexer and the retriever
//! - **[`storage`]**: the `ChunkStore` trait with SQLite and in-memory backends
//! - **[`config`]** and **[`error`]**: configuration and tagged error outcomes
//!
//! ## Quick Start
//!
//! ```rust
//! use stockwire_retriever::config::RetrieverConfig;
//! use stockwire_retriever::retrieval::{document::Document, news_index::NewsIndex};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let index = NewsIndex::in_memory(RetrieverConfig::default())?;
//! index
//!     .index_documents("ACME", &[Document::new("Acme beats estimates", "Strong quarter")])
//!     .await?;
//! let hits = index.retrieve("ACME", "estimates").await?;
//! assert_eq!(hits.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Documents → Tokenizer → Indexer → ChunkStore (SQLite | memory)
//!                                        ↓
//!              Query → Tokenizer → Retriever → ranked chunks
//! ```

pub mod config;
pub mod error;
pub mod retrieval;
pub mod storage;

pub use error::{IndexingError, RetrievalError, RetrieverError};
pub use retrieval::document::Document;
pub use retrieval::indexer::index_documents;
pub use retrieval::retriever::{ScoredChunk, retrieve};

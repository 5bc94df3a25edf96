//! Storage abstraction layer for stockwire-retriever
//!
//! The indexer and retriever never own chunk data themselves; they talk to a
//! [`ChunkStore`] handle passed in by the caller. A store maps a symbol to the
//! ordered collection of chunks appended for it.
//!
//! ## Key Components
//!
//! - **ChunkStore**: append and list operations keyed by symbol
//! - **SqliteStore**: durable implementation on a single SQLite file
//! - **MemoryStore**: process-local implementation for tests and embedding
//! - **StoredChunk**: a persisted chunk with its term-frequency table
//!
//! ## Architecture
//!
//! ```text
//! Indexer ── append_chunk ─┐
//!                          ├─ ChunkStore ── SqliteStore | MemoryStore
//! Retriever ── list_chunks ┘
//! ```
//!
//! Stores must make each `append_chunk` atomic and visible to every later
//! `list_chunks` for the same symbol, and must list chunks in append order.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use stockwire_context::TermFrequencies;

pub mod memory_store;
pub mod sqlite_store;

/// Identifier the store assigns to an appended chunk.
pub type ChunkId = i64;

/// A chunk as persisted by a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredChunk {
    pub id: ChunkId,
    pub symbol: String,
    /// Space-joined normalized terms
    pub text: String,
    pub term_frequencies: TermFrequencies,
    pub created_at: DateTime<Utc>,
}

/// Per-symbol chunk persistence. See module docs for the ordering contract.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persist one chunk and return its ID
    async fn append_chunk(
        &self,
        symbol: &str,
        text: &str,
        term_frequencies: &TermFrequencies,
    ) -> Result<ChunkId>;

    /// All chunks for a symbol, in append order
    async fn list_chunks(&self, symbol: &str) -> Result<Vec<StoredChunk>>;

    /// Number of chunks stored for a symbol
    async fn count_chunks(&self, symbol: &str) -> Result<usize>;

    /// Every symbol with at least one chunk, with its chunk count, ordered by symbol
    async fn list_symbols(&self) -> Result<Vec<(String, usize)>>;
}

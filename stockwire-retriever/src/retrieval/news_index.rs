//! Store handle plus configuration, for callers that index and query the
//! same store repeatedly.
//!
//! [`NewsIndex`] adds no state of its own beyond the configuration. Every
//! operation goes straight to [`index_documents`] or [`retrieve`] with the
//! store it owns.

use super::document::Document;
use super::indexer::index_documents;
use super::retriever::{ScoredChunk, retrieve};
use crate::config::RetrieverConfig;
use crate::error::{Result, RetrieverError};
use crate::storage::ChunkStore;
use crate::storage::memory_store::MemoryStore;
use crate::storage::sqlite_store::SqliteStore;
use std::path::Path;
use std::sync::Arc;

/// A chunk store together with the chunk size and result count to use on it.
pub struct NewsIndex<S: ChunkStore + ?Sized> {
    store: Arc<S>,
    config: RetrieverConfig,
}

impl<S: ChunkStore + ?Sized> Clone for NewsIndex<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: ChunkStore + ?Sized> NewsIndex<S> {
    /// Wraps an existing store. The configuration is validated first.
    pub fn new(store: Arc<S>, config: RetrieverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Index documents with the configured chunk size.
    pub async fn index_documents(&self, symbol: &str, documents: &[Document]) -> Result<usize> {
        self.index_documents_with(symbol, documents, self.config.chunk_size)
            .await
    }

    /// Index documents with an explicit chunk size.
    pub async fn index_documents_with(
        &self,
        symbol: &str,
        documents: &[Document],
        chunk_size: usize,
    ) -> Result<usize> {
        Ok(index_documents(self.store.as_ref(), symbol, documents, chunk_size).await?)
    }

    /// Query with the configured result count.
    pub async fn retrieve(&self, symbol: &str, query: &str) -> Result<Vec<ScoredChunk>> {
        self.retrieve_with(symbol, query, self.config.top_k).await
    }

    /// Query with an explicit result count.
    pub async fn retrieve_with(
        &self,
        symbol: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        Ok(retrieve(self.store.as_ref(), symbol, query, k).await?)
    }
}

impl NewsIndex<SqliteStore> {
    /// Opens the SQLite store named by `config.database_file` inside `base`.
    pub async fn open(base: &Path, config: RetrieverConfig) -> Result<Self> {
        config.validate()?;
        let store = SqliteStore::open(base, &config.database_file)
            .await
            .map_err(RetrieverError::store)?;
        Self::new(Arc::new(store), config)
    }
}

impl NewsIndex<MemoryStore> {
    /// A fresh in-memory index.
    pub fn in_memory(config: RetrieverConfig) -> Result<Self> {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_uses_configured_defaults() -> anyhow::Result<()> {
        let config = RetrieverConfig::default().with_chunk_size(2).with_top_k(1);
        let index = NewsIndex::in_memory(config)?;

        let written = index
            .index_documents("ACME", &[Document::new("acme up", "acme down")])
            .await?;
        // "acme up acme down" -> two windows of two terms
        assert_eq!(written, 2);

        let results = index.retrieve("ACME", "down").await?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "acme down");

        let all = index.retrieve_with("ACME", "down", 10).await?;
        assert_eq!(all.len(), 2);
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = NewsIndex::in_memory(RetrieverConfig::default().with_chunk_size(0));
        assert!(matches!(result, Err(RetrieverError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_open_reports_store_failure() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        let missing = temp_dir.path().join("no-such-dir");

        let result = NewsIndex::open(&missing, RetrieverConfig::default()).await;
        match result {
            Err(RetrieverError::Store { source }) => {
                assert!(source.to_string().contains("Failed to open chunk database"));
            }
            Err(other) => panic!("expected a store error, got {other}"),
            Ok(_) => panic!("opened a database in a missing directory"),
        }

        let index = NewsIndex::open(temp_dir.path(), RetrieverConfig::default()).await?;
        assert!(index.store().db_path().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_works_behind_trait_object() -> anyhow::Result<()> {
        let store: Arc<dyn ChunkStore> = Arc::new(SqliteStore::open_memory().await?);
        let index = NewsIndex::new(store, RetrieverConfig::default())?;

        index
            .index_documents("ACME", &[Document::new("Acme", "earnings call")])
            .await?;
        assert_eq!(index.store().count_chunks("ACME").await?, 1);
        Ok(())
    }
}

//! Write path: documents to persisted term-frequency chunks.

use super::chunking_strategy::ChunkingStrategy;
use super::document::Document;
use crate::error::IndexingError;
use crate::storage::ChunkStore;
use tracing::{debug, info, warn};

/// Chunks every document and appends the chunks to `store` under `symbol`.
///
/// Returns the number of chunks written. Documents without any terms add
/// nothing. The first failed append aborts the call; chunks written before it
/// are left in place.
pub async fn index_documents<S>(
    store: &S,
    symbol: &str,
    documents: &[Document],
    chunk_size: usize,
) -> Result<usize, IndexingError>
where
    S: ChunkStore + ?Sized,
{
    let strategy = ChunkingStrategy::new(chunk_size);
    let mut written = 0;

    for (position, document) in documents.iter().enumerate() {
        let chunks = strategy.chunk_document(document);
        debug!(
            "Document {} for {} produced {} chunks",
            position,
            symbol,
            chunks.len()
        );

        for chunk in chunks {
            let id = store
                .append_chunk(symbol, &chunk.text, &chunk.term_frequencies)
                .await
                .map_err(|e| {
                    warn!("Failed to append chunk for {}: {}", symbol, e);
                    IndexingError::new(symbol, e)
                })?;
            debug!("Stored chunk {} ({} terms)", id, chunk.term_frequencies.total());
            written += 1;
        }
    }

    info!(
        "Indexed {} documents for {} into {} chunks",
        documents.len(),
        symbol,
        written
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_store::MemoryStore;
    use crate::storage::{ChunkId, StoredChunk};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stockwire_context::TermFrequencies;
    use tracing_test::traced_test;

    /// Accepts a fixed number of appends, then fails every write.
    struct FailingStore {
        inner: MemoryStore,
        remaining: AtomicUsize,
    }

    #[async_trait]
    impl ChunkStore for FailingStore {
        async fn append_chunk(
            &self,
            symbol: &str,
            text: &str,
            term_frequencies: &TermFrequencies,
        ) -> anyhow::Result<ChunkId> {
            let left = self.remaining.load(Ordering::SeqCst);
            if left == 0 {
                anyhow::bail!("disk full");
            }
            self.remaining.store(left - 1, Ordering::SeqCst);
            self.inner.append_chunk(symbol, text, term_frequencies).await
        }

        async fn list_chunks(&self, symbol: &str) -> anyhow::Result<Vec<StoredChunk>> {
            self.inner.list_chunks(symbol).await
        }

        async fn count_chunks(&self, symbol: &str) -> anyhow::Result<usize> {
            self.inner.count_chunks(symbol).await
        }

        async fn list_symbols(&self) -> anyhow::Result<Vec<(String, usize)>> {
            self.inner.list_symbols().await
        }
    }

    #[tokio::test]
    async fn test_counts_chunks_across_documents() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let long_summary = vec!["growth"; 250].join(" ");
        let docs = vec![
            Document::new("Acme beats estimates", "Acme Corp reported strong quarterly growth"),
            Document::new("", long_summary),
            Document::default(),
        ];

        let written = index_documents(&store, "ACME", &docs, 120).await?;
        assert_eq!(written, 4);
        assert_eq!(store.count_chunks("ACME").await?, 4);

        let chunks = store.list_chunks("ACME").await?;
        assert!(chunks[0].text.starts_with("acme beats"));
        assert_eq!(chunks[1].term_frequencies.get("growth"), 120);
        assert_eq!(chunks[3].term_frequencies.get("growth"), 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_documents_writes_nothing() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        assert_eq!(index_documents(&store, "ACME", &[], 120).await?, 0);
        assert!(store.list_symbols().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_store_failure_aborts_without_rollback() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            remaining: AtomicUsize::new(1),
        };
        let docs = vec![
            Document::new("first", "document"),
            Document::new("second", "document"),
            Document::new("third", "document"),
        ];

        let err = index_documents(&store, "ACME", &docs, 120)
            .await
            .unwrap_err();
        assert_eq!(err.symbol, "ACME");
        assert_eq!(err.source.to_string(), "disk full");
        assert_eq!(store.inner.count_chunks("ACME").await.unwrap(), 1);
        assert!(logs_contain("Failed to append chunk for ACME"));
    }
}

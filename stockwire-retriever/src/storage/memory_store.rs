//! In-process implementation of [`ChunkStore`].
//!
//! Chunks live in a map from symbol to an append-only vector behind a tokio
//! `RwLock`. IDs come from a shared counter, so they increase across symbols
//! in append order. Nothing survives the process.

use super::{ChunkId, ChunkStore, StoredChunk};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use stockwire_context::TermFrequencies;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    chunks: RwLock<HashMap<String, Vec<StoredChunk>>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn append_chunk(
        &self,
        symbol: &str,
        text: &str,
        term_frequencies: &TermFrequencies,
    ) -> Result<ChunkId> {
        let mut chunks = self.chunks.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        chunks
            .entry(symbol.to_string())
            .or_default()
            .push(StoredChunk {
                id,
                symbol: symbol.to_string(),
                text: text.to_string(),
                term_frequencies: term_frequencies.clone(),
                created_at: chrono::Utc::now(),
            });
        Ok(id)
    }

    async fn list_chunks(&self, symbol: &str) -> Result<Vec<StoredChunk>> {
        let chunks = self.chunks.read().await;
        Ok(chunks.get(symbol).cloned().unwrap_or_default())
    }

    async fn count_chunks(&self, symbol: &str) -> Result<usize> {
        let chunks = self.chunks.read().await;
        Ok(chunks.get(symbol).map_or(0, Vec::len))
    }

    async fn list_symbols(&self) -> Result<Vec<(String, usize)>> {
        let chunks = self.chunks.read().await;
        let mut symbols: Vec<(String, usize)> = chunks
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(symbol, list)| (symbol.clone(), list.len()))
            .collect();
        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwire_context::{term_frequencies, tokenize};

    #[tokio::test]
    async fn test_append_and_list_in_order() -> Result<()> {
        let store = MemoryStore::new();
        let tf = term_frequencies(&tokenize("acme rises"));

        let first = store.append_chunk("ACME", "acme rises", &tf).await?;
        let other = store.append_chunk("OTHR", "acme rises", &tf).await?;
        let second = store.append_chunk("ACME", "acme rises", &tf).await?;
        assert!(first < other && other < second);

        let chunks = store.list_chunks("ACME").await?;
        let ids: Vec<ChunkId> = chunks.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(chunks[0].term_frequencies, tf);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty() -> Result<()> {
        let store = MemoryStore::new();
        assert!(store.list_chunks("NOPE").await?.is_empty());
        assert_eq!(store.count_chunks("NOPE").await?, 0);
        assert!(store.list_symbols().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_symbols_sorted_with_counts() -> Result<()> {
        let store = MemoryStore::new();
        let tf = term_frequencies(&tokenize("x"));
        store.append_chunk("ZZZ", "x", &tf).await?;
        store.append_chunk("AAA", "x", &tf).await?;
        store.append_chunk("AAA", "x", &tf).await?;

        assert_eq!(
            store.list_symbols().await?,
            vec![("AAA".to_string(), 2), ("ZZZ".to_string(), 1)]
        );
        Ok(())
    }
}

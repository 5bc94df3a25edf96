//! SQLite implementation of [`ChunkStore`].
//!
//! All chunks for all symbols live in one table. The term-frequency table of a
//! chunk is stored as JSON text holding a list of `[term, count]` pairs.
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE chunks (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT, -- append order
//!     symbol TEXT NOT NULL,
//!     content TEXT NOT NULL,                -- space-joined terms
//!     term_frequencies TEXT NOT NULL,       -- [["acme",2],["corp",1]]
//!     created_at TIMESTAMP NOT NULL
//! );
//! ```
//!
//! ## SQLite Settings
//!
//! - **WAL mode**: readers are not blocked by an indexing writer
//! - **Busy timeout**: concurrent writers wait instead of failing immediately
//! - Each append is a single `INSERT`, so every chunk is written atomically

use super::{ChunkId, ChunkStore, StoredChunk};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use stockwire_context::TermFrequencies;

/// SQLite-based chunk store. Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    db_path: Option<PathBuf>,
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) `database_file` inside `base`.
    pub async fn open(base: &Path, database_file: &str) -> Result<Self> {
        let db_path = base.join(database_file);

        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(&db_path)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5))
                .create_if_missing(true),
        )
        .await
        .with_context(|| format!("Failed to open chunk database {}", db_path.display()))?;

        tracing::debug!("Opened chunk database at {}", db_path.display());
        Self::new_with_pool(Some(db_path), pool).await
    }

    /// Opens a private in-memory database for testing.
    pub async fn open_memory() -> Result<Self> {
        // Every pooled connection to :memory: would see its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::new_with_pool(None, pool).await
    }

    async fn new_with_pool(db_path: Option<PathBuf>, pool: SqlitePool) -> Result<Self> {
        Self::create_tables(&pool).await?;
        Ok(Self { db_path, pool })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                content TEXT NOT NULL,
                term_frequencies TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_symbol ON chunks(symbol, id)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Location of the database file, `None` for in-memory stores.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Get the database pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_chunk(row: &SqliteRow) -> Result<StoredChunk> {
        let id: i64 = row.try_get("id")?;
        let encoded: String = row.try_get("term_frequencies")?;
        let term_frequencies: TermFrequencies = serde_json::from_str(&encoded)
            .with_context(|| format!("Corrupt term-frequency table for chunk {id}"))?;

        Ok(StoredChunk {
            id,
            symbol: row.try_get("symbol")?,
            text: row.try_get("content")?,
            term_frequencies,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl ChunkStore for SqliteStore {
    async fn append_chunk(
        &self,
        symbol: &str,
        text: &str,
        term_frequencies: &TermFrequencies,
    ) -> Result<ChunkId> {
        let encoded = serde_json::to_string(term_frequencies)?;

        let result = sqlx::query(
            r#"
            INSERT INTO chunks (symbol, content, term_frequencies, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(symbol)
        .bind(text)
        .bind(&encoded)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_chunks(&self, symbol: &str) -> Result<Vec<StoredChunk>> {
        let rows = sqlx::query(
            "SELECT id, symbol, content, term_frequencies, created_at FROM chunks WHERE symbol = ?1 ORDER BY id",
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_chunk).collect()
    }

    async fn count_chunks(&self, symbol: &str) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks WHERE symbol = ?1")
            .bind(symbol)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn list_symbols(&self) -> Result<Vec<(String, usize)>> {
        let rows = sqlx::query(
            "SELECT symbol, COUNT(*) AS chunk_count FROM chunks GROUP BY symbol ORDER BY symbol",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut symbols = Vec::with_capacity(rows.len());
        for row in rows {
            let symbol: String = row.try_get("symbol")?;
            let count: i64 = row.try_get("chunk_count")?;
            symbols.push((symbol, count as usize));
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwire_context::{term_frequencies, tokenize};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_append_and_list_round_trip() -> Result<()> {
        let store = SqliteStore::open_memory().await?;
        let text = "acme beats estimates acme corp";
        let tf = term_frequencies(&tokenize(text));

        let id = store.append_chunk("BE03", text, &tf).await?;
        let chunks = store.list_chunks("BE03").await?;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, id);
        assert_eq!(chunks[0].symbol, "BE03");
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].term_frequencies, tf);
        assert_eq!(chunks[0].term_frequencies.get("acme"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_symbols_are_isolated_and_ordered() -> Result<()> {
        let store = SqliteStore::open_memory().await?;
        let tf = term_frequencies(&tokenize("x"));

        let a1 = store.append_chunk("AAA", "x", &tf).await?;
        store.append_chunk("BBB", "x", &tf).await?;
        let a2 = store.append_chunk("AAA", "x", &tf).await?;

        let ids: Vec<ChunkId> = store
            .list_chunks("AAA")
            .await?
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![a1, a2]);
        assert_eq!(store.count_chunks("BBB").await?, 1);
        assert_eq!(store.count_chunks("CCC").await?, 0);
        assert_eq!(
            store.list_symbols().await?,
            vec![("AAA".to_string(), 2), ("BBB".to_string(), 1)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_persists_across_reopen() -> Result<()> {
        let temp_dir = tempdir()?;
        let tf = term_frequencies(&tokenize("quarterly growth"));

        {
            let store = SqliteStore::open(temp_dir.path(), ".stockwire.db").await?;
            store.append_chunk("ACME", "quarterly growth", &tf).await?;
            store.pool().close().await;
        }

        let store = SqliteStore::open(temp_dir.path(), ".stockwire.db").await?;
        assert_eq!(
            store.db_path(),
            Some(temp_dir.path().join(".stockwire.db").as_path())
        );
        let chunks = store.list_chunks("ACME").await?;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].term_frequencies, tf);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_table_is_an_error() -> Result<()> {
        let store = SqliteStore::open_memory().await?;
        sqlx::query(
            "INSERT INTO chunks (symbol, content, term_frequencies, created_at) VALUES ('BAD', 'x', 'not json', ?1)",
        )
        .bind(Utc::now())
        .execute(store.pool())
        .await?;

        assert!(store.list_chunks("BAD").await.is_err());
        Ok(())
    }
}

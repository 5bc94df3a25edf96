//! Runtime configuration for indexing and retrieval.
//!
//! Values come from an optional TOML file; any key left out keeps its default.
//! The CLI applies its own flags on top with the `with_*` builder methods.
//!
//! ```toml
//! chunk_size = 120
//! top_k = 5
//! database_file = ".stockwire.db"
//! ```

use crate::error::{Result, RetrieverError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum number of terms per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 120;

/// Default number of results returned by a query.
pub const DEFAULT_TOP_K: usize = 5;

/// Default SQLite file name inside the base directory.
pub const DEFAULT_DATABASE_FILE: &str = ".stockwire.db";

/// Configuration for the indexer, the retriever and the SQLite store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrieverConfig {
    /// Maximum number of terms in a chunk
    pub chunk_size: usize,
    /// Number of ranked chunks a query returns
    pub top_k: usize,
    /// Database file name, relative to the base directory
    pub database_file: String,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_k: DEFAULT_TOP_K,
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

impl RetrieverConfig {
    /// Reads a TOML configuration file and validates it.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&raw)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_database_file(mut self, database_file: impl Into<String>) -> Self {
        self.database_file = database_file.into();
        self
    }

    /// Rejects values the indexer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RetrieverError::invalid_config(
                "chunk_size must be at least 1",
            ));
        }
        if self.database_file.trim().is_empty() {
            return Err(RetrieverError::invalid_config(
                "database_file must not be empty",
            ));
        }
        Ok(())
    }
}

//! Error types for indexing and retrieval

/// Result type for operations that go through the [`RetrieverError`] umbrella.
pub type Result<T> = std::result::Result<T, RetrieverError>;

/// A chunk store write failed while indexing documents for a symbol.
///
/// Indexing stops at the first failed write. Chunks appended before the
/// failure stay in the store; no rollback is attempted.
#[derive(Debug, thiserror::Error)]
#[error("Indexing failed for symbol '{symbol}': {source}")]
pub struct IndexingError {
    pub symbol: String,
    #[source]
    pub source: anyhow::Error,
}

/// A chunk store read failed while retrieving chunks for a symbol.
#[derive(Debug, thiserror::Error)]
#[error("Retrieval failed for symbol '{symbol}': {source}")]
pub struct RetrievalError {
    pub symbol: String,
    #[source]
    pub source: anyhow::Error,
}

/// Umbrella error for the engine facade, configuration and CLI.
///
/// Callers that need to tell a write failure from a read failure match on
/// [`RetrieverError::Indexing`] and [`RetrieverError::Retrieval`] rather than
/// inspecting messages.
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error(transparent)]
    Indexing(#[from] IndexingError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Configuration values that cannot be used
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },

    /// The chunk store could not be opened
    #[error("Failed to open chunk store: {source}")]
    Store {
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl IndexingError {
    pub fn new(symbol: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            symbol: symbol.into(),
            source,
        }
    }
}

impl RetrievalError {
    pub fn new(symbol: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            symbol: symbol.into(),
            source,
        }
    }
}

impl RetrieverError {
    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Wrap a failure to open or initialize a chunk store.
    pub fn store(source: anyhow::Error) -> Self {
        Self::Store { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_distinguishable_by_variant() {
        let write: RetrieverError =
            IndexingError::new("ACME", anyhow::anyhow!("disk full")).into();
        let read: RetrieverError =
            RetrievalError::new("ACME", anyhow::anyhow!("database is locked")).into();

        assert!(matches!(write, RetrieverError::Indexing(_)));
        assert!(matches!(read, RetrieverError::Retrieval(_)));
        assert_eq!(
            write.to_string(),
            "Indexing failed for symbol 'ACME': disk full"
        );
    }

    #[test]
    fn test_source_is_preserved() {
        let err = RetrievalError::new("ACME", anyhow::anyhow!("boom"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn test_store_error_keeps_source() {
        let err = RetrieverError::store(anyhow::anyhow!("unable to open database file"));
        assert!(matches!(err, RetrieverError::Store { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to open chunk store: unable to open database file"
        );
    }
}

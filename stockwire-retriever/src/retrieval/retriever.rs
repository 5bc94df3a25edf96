//! Read path: TF-IDF cosine ranking of one symbol's chunks against a query.
//!
//! ## Scoring
//!
//! For every distinct query term `t` with query count `q` and chunk count `c`:
//!
//! ```text
//! idf(t) = ln((N + 1) / (1 + [c > 0]))      N = chunks stored for the symbol
//! qw     = q * idf(t)
//! cw     = c * idf(t)
//! score  = Σ qw·cw / (sqrt(Σ qw²) * sqrt(Σ cw²))   (denominator 0 → 1)
//! ```
//!
//! The presence indicator looks at the chunk being scored only, not at how
//! many chunks in the corpus contain the term. This chunk-local weighting is
//! the established ranking contract and is kept as is; it differs from
//! textbook IDF, which would count documents across the corpus.
//!
//! Only query terms contribute to either norm, so a chunk's extra terms do not
//! lower its score.

use crate::error::RetrievalError;
use crate::storage::{ChunkId, ChunkStore};
use serde::Serialize;
use stockwire_context::{TermFrequencies, term_frequencies, tokenize};
use tracing::{debug, warn};

/// A ranked chunk returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub id: ChunkId,
    pub text: String,
    pub score: f64,
}

/// Cosine similarity between a query table and a chunk table under the
/// chunk-local IDF described in the module docs.
pub fn score_chunk(query: &TermFrequencies, chunk: &TermFrequencies, corpus_size: usize) -> f64 {
    let mut dot = 0.0_f64;
    let mut query_norm_sq = 0.0_f64;
    let mut chunk_norm_sq = 0.0_f64;

    for (term, query_count) in query.iter() {
        let chunk_count = chunk.get(term);
        let indicator = if chunk_count > 0 { 1.0 } else { 0.0 };
        let idf = ((corpus_size as f64 + 1.0) / (1.0 + indicator)).ln();

        let query_weight = f64::from(query_count) * idf;
        let chunk_weight = f64::from(chunk_count) * idf;

        dot += query_weight * chunk_weight;
        query_norm_sq += query_weight * query_weight;
        chunk_norm_sq += chunk_weight * chunk_weight;
    }

    let mut denominator = query_norm_sq.sqrt() * chunk_norm_sq.sqrt();
    if denominator == 0.0 {
        denominator = 1.0;
    }
    dot / denominator
}

/// Returns up to `k` chunks of `symbol` ranked by score, best first.
///
/// Ties keep the order in which the store lists chunks (append order), so
/// identical store state and arguments always give identical output. A
/// symbol without chunks yields an empty result.
pub async fn retrieve<S>(
    store: &S,
    symbol: &str,
    query: &str,
    k: usize,
) -> Result<Vec<ScoredChunk>, RetrievalError>
where
    S: ChunkStore + ?Sized,
{
    let chunks = store.list_chunks(symbol).await.map_err(|e| {
        warn!("Failed to load chunks for {}: {}", symbol, e);
        RetrievalError::new(symbol, e)
    })?;

    if chunks.is_empty() {
        debug!("No chunks stored for {}", symbol);
        return Ok(Vec::new());
    }

    let corpus_size = chunks.len();
    let query_tf = term_frequencies(&tokenize(query));

    let mut scored: Vec<ScoredChunk> = chunks
        .into_iter()
        .map(|chunk| ScoredChunk {
            score: score_chunk(&query_tf, &chunk.term_frequencies, corpus_size),
            id: chunk.id,
            text: chunk.text,
        })
        .collect();

    // Stable sort: equal scores stay in append order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(k);

    debug!(
        "Ranked {} chunks for {} (query terms: {}), returning {}",
        corpus_size,
        symbol,
        query_tf.len(),
        scored.len()
    );
    Ok(scored)
}

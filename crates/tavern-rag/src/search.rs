//! Cosine ranking over a flat index.

use crate::embeddings::EmbeddingProvider;
use crate::error::RagError;
use crate::store::{Index, IndexEntry};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tavern_core::DimensionPolicy;
use tracing::warn;

/// Number of hits returned when nothing else is configured.
pub const DEFAULT_TOP_K: usize = 6;

/// An index entry scored against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHit {
    #[serde(flatten)]
    pub entry: IndexEntry,

    /// Cosine similarity in [-1, 1].
    pub score: f32,
}

/// Compute cosine similarity between two vectors.
///
/// Vectors of different lengths are both trimmed to the shorter length.
/// A zero-norm vector has similarity 0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    // Accumulate in f64 so large components cannot overflow to inf
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)) as f32
}

/// Score every entry against `query` and keep the best `top_k`.
///
/// Results are in non-increasing score order; equal scores keep index order.
pub fn rank(
    query: &[f32],
    entries: &[IndexEntry],
    top_k: usize,
    policy: DimensionPolicy,
) -> Result<Vec<ScoredHit>> {
    let mut mismatched = 0usize;
    let mut hits = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.embedding.len() != query.len() {
            if policy == DimensionPolicy::Reject {
                return Err(RagError::DimensionMismatch {
                    id: entry.id.clone(),
                    query: query.len(),
                    entry: entry.embedding.len(),
                });
            }
            mismatched += 1;
        }

        hits.push(ScoredHit {
            entry: entry.clone(),
            score: cosine_similarity(query, &entry.embedding),
        });
    }

    if mismatched > 0 {
        warn!(
            "{} of {} entries differ from the {}-dimension query; compared truncated vectors",
            mismatched,
            entries.len(),
            query.len()
        );
    }

    // Vec::sort_by is stable, so ties keep insertion order
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);

    Ok(hits)
}

/// Embeds a query and ranks it against a loaded index.
pub struct RulesQuery {
    index: Index,
    embeddings: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    policy: DimensionPolicy,
}

impl RulesQuery {
    /// Create a query engine over `index`.
    pub fn new(index: Index, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            index,
            embeddings,
            top_k: DEFAULT_TOP_K,
            policy: DimensionPolicy::default(),
        }
    }

    /// Set the result limit.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the dimension policy.
    pub fn with_policy(mut self, policy: DimensionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The index being searched.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Result limit.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embed `text` and return the best matching entries.
    pub async fn search(&self, text: &str) -> Result<Vec<ScoredHit>> {
        if self.embeddings.model() != self.index.embedding_model {
            warn!(
                "Querying an index built with {} using {}; scores may be meaningless",
                self.index.embedding_model,
                self.embeddings.model()
            );
        }

        let query = self.embeddings.embed(text).await?;
        rank(&query, &self.index.items, self.top_k, self.policy)
    }
}

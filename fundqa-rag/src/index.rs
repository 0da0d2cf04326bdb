//! In-memory vector index with cosine-similarity search.
//!
//! The index is a request-scoped value: the pipeline builds one from the
//! corpus (or reuses a cached build) and hands it to retrieval for the
//! lifetime of a single question.

use tracing::debug;

use crate::document::{Chunk, ScoredChunk};
use crate::error::{QaError, Result};

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// An insertion-ordered, in-memory store of embedded chunks.
///
/// Insertion order does not affect which chunks a search returns, but it is
/// the tie-breaker when two chunks score identically, which keeps retrieval
/// deterministic.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: Vec<Chunk>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an embedded chunk. The chunk must have its embedding attached.
    pub fn insert(&mut self, chunk: Chunk) {
        self.entries.push(chunk);
    }

    /// Number of chunks stored in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds zero chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Search for the `top_k` chunks most similar to the given embedding.
    ///
    /// Returns results ordered by descending cosine similarity; equal scores
    /// keep their insertion order. `top_k` larger than the index size is
    /// clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::EmptyIndex`] if the index holds zero chunks.
    pub fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() {
            return Err(QaError::EmptyIndex);
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|chunk| {
                let score = cosine_similarity(&chunk.embedding, embedding);
                ScoredChunk { chunk: chunk.clone(), score }
            })
            .collect();

        // Stable sort: ties keep original chunk order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        debug!(result_count = scored.len(), index_size = self.entries.len(), "index searched");

        Ok(scored)
    }
}

//! Embedding capability interface.

use async_trait::async_trait;

use crate::error::Result;

/// A capability that maps text to fixed-dimension vectors in semantic space.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. Chunks and questions must be embedded by the same provider —
/// vectors from different models are not comparable. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends with native
/// batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::EmbeddingService`](crate::QaError::EmbeddingService)
    /// when the backend is unreachable, times out, or returns malformed output.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The returned vectors correspond one-to-one with `texts`, in order.
    /// Any failure aborts the whole batch.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

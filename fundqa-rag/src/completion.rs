//! Completion capability interface for answer generation.

use async_trait::async_trait;

use crate::error::Result;

/// A capability that generates text from a rendered prompt.
///
/// Implementations wrap a specific language-model backend. The model
/// identifier and output-length cap are the implementation's configuration;
/// callers receive the backend's text verbatim, with no post-processing and
/// no truncation beyond what the backend itself enforces.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::GenerationService`](crate::QaError::GenerationService)
    /// on backend failure (timeout, quota, malformed response). A failure must
    /// propagate; implementations never substitute a fabricated or empty answer.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

//! Error types for the `fundqa-rag` crate.

use thiserror::Error;

/// Errors that can abort a question-answering run.
///
/// None of these are recovered locally: each one aborts the current request
/// and is surfaced to the caller as a distinguishable failure category.
#[derive(Debug, Error)]
pub enum QaError {
    /// Invalid pipeline or chunking parameters. Raised at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The embedding capability was unreachable or returned malformed output.
    #[error("Embedding service error ({provider}): {message}")]
    EmbeddingService {
        /// The embedding backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The index holds zero chunks, so there is nothing to search.
    #[error("Empty index: no chunks available to search")]
    EmptyIndex,

    /// The prompt template is missing a required placeholder.
    #[error("Template error: {0}")]
    Template(String),

    /// The completion capability failed while generating an answer.
    #[error("Generation service error ({provider}): {message}")]
    GenerationService {
        /// The completion backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The document corpus could not be loaded.
    #[error("Document error: {0}")]
    Document(String),
}

/// A convenience result type for question-answering operations.
pub type Result<T> = std::result::Result<T, QaError>;

//! Retrieval-augmented question answering over a fixed document corpus.
//!
//! `fundqa-rag` is the core of the fundqa service: it segments a loaded
//! corpus into overlapping chunks, embeds and indexes them, retrieves the
//! chunks most similar to a question, renders them into an instruction
//! template, and sends the result to a language-model backend.
//!
//! Embedding and generation are external capabilities behind the
//! [`EmbeddingProvider`] and [`CompletionProvider`] traits; OpenAI-backed
//! implementations live in the [`openai`] module (feature `openai`), and
//! PDF corpus loading in [`loader`] (feature `pdf`).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fundqa_rag::{QaConfig, QaPipeline, loader::load_corpus};
//! use fundqa_rag::openai::{OpenAiChatProvider, OpenAiEmbeddingProvider};
//!
//! let corpus = load_corpus("fund_documentation.pdf".as_ref()).await?;
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .embedding_provider(Arc::new(OpenAiEmbeddingProvider::from_env()?))
//!     .completion_provider(Arc::new(OpenAiChatProvider::from_env()?))
//!     .corpus(corpus)
//!     .build()?;
//!
//! let answer = pipeline.ask("What fee does Fund ABC charge?").await?;
//! ```

pub mod chunking;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
pub mod pipeline;
pub mod prompt;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{BoundaryChunker, Chunker};
pub use completion::CompletionProvider;
pub use config::QaConfig;
pub use document::{Chunk, Document, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{QaError, Result};
pub use index::InMemoryIndex;
pub use loader::{DocumentLoader, TextLoader, load_corpus};
pub use pipeline::QaPipeline;
pub use prompt::{DEFAULT_TEMPLATE, PromptTemplate};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

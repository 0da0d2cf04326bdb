//! Question-answering pipeline orchestrator.
//!
//! The [`QaPipeline`] runs the full flow for one question: segment the
//! corpus, embed and index the chunks, retrieve the most similar chunks for
//! the question, render the prompt, and generate the answer. Construct one
//! via [`QaPipeline::builder()`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fundqa_rag::{QaConfig, QaPipeline};
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .completion_provider(Arc::new(generator))
//!     .corpus(documents)
//!     .build()?;
//!
//! let answer = pipeline.ask("What fee does Fund ABC charge?").await?;
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::chunking::{BoundaryChunker, Chunker};
use crate::completion::CompletionProvider;
use crate::config::QaConfig;
use crate::document::{Document, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::index::InMemoryIndex;
use crate::prompt::PromptTemplate;

/// A cached index build, valid while the corpus fingerprint is unchanged.
struct CachedIndex {
    fingerprint: u64,
    index: Arc<InMemoryIndex>,
}

/// The question-answering pipeline.
///
/// Each [`ask`](QaPipeline::ask) runs sequentially: index → retrieve →
/// assemble → generate. By default the index is rebuilt from the corpus on
/// every question; [`cache_index`](QaPipelineBuilder::cache_index) opts into
/// reusing a build across questions, invalidated when the corpus or the
/// chunking parameters change. Caching never changes retrieval results.
pub struct QaPipeline {
    config: QaConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    completion_provider: Arc<dyn CompletionProvider>,
    chunker: Arc<dyn Chunker>,
    template: PromptTemplate,
    corpus: Vec<Document>,
    cache: Option<RwLock<Option<CachedIndex>>>,
}

impl std::fmt::Debug for QaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaPipeline")
            .field("config", &self.config)
            .field("corpus_len", &self.corpus.len())
            .field("cache_enabled", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Answer a question from the corpus.
    ///
    /// Returns the completion backend's text verbatim.
    ///
    /// # Errors
    ///
    /// Propagates the failure of whichever stage aborted the run:
    /// [`QaError::EmbeddingService`], [`QaError::EmptyIndex`], or
    /// [`QaError::GenerationService`]. No stage failure is converted into a
    /// partial or empty answer.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let index = self.index().await?;
        let retrieved = self.search(&index, question).await?;

        let prompt = self.template.render(&retrieved, question);
        debug!(context_chunks = retrieved.len(), prompt_len = prompt.len(), "prompt assembled");

        let answer = self.completion_provider.complete(&prompt).await?;
        info!(question_len = question.len(), answer_len = answer.len(), "question answered");

        Ok(answer)
    }

    /// Retrieve the chunks most similar to a question, without generating.
    ///
    /// Results are ordered by descending similarity, at most `top_k` of them.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::EmbeddingService`] if the question cannot be
    /// embedded and [`QaError::EmptyIndex`] if the corpus produced no chunks.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>> {
        let index = self.index().await?;
        self.search(&index, question).await
    }

    /// Embed the question and search the index with the configured `top_k`.
    async fn search(&self, index: &InMemoryIndex, question: &str) -> Result<Vec<ScoredChunk>> {
        let question_embedding = self.embedding_provider.embed(question).await?;
        index.search(&question_embedding, self.config.top_k)
    }

    /// Obtain the index for this run: a fresh build, or the cached build
    /// when caching is enabled and the corpus fingerprint still matches.
    async fn index(&self) -> Result<Arc<InMemoryIndex>> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(self.build_index().await?));
        };

        let fingerprint = self.fingerprint();
        {
            let guard = cache.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.fingerprint == fingerprint {
                    debug!(fingerprint, "reusing cached index");
                    return Ok(Arc::clone(&cached.index));
                }
            }
        }

        debug!(fingerprint, "index cache miss, building");
        let index = Arc::new(self.build_index().await?);
        let mut guard = cache.write().await;
        *guard = Some(CachedIndex { fingerprint, index: Arc::clone(&index) });
        Ok(index)
    }

    /// Build the index: segment every corpus document, embed all chunk texts
    /// as one batch, and insert the embedded chunks in segmentation order.
    ///
    /// Any embedding failure aborts the build; a partial index is never kept.
    async fn build_index(&self) -> Result<InMemoryIndex> {
        let mut chunks = Vec::new();
        for document in &self.corpus {
            chunks.extend(self.chunker.chunk(document));
        }

        let mut index = InMemoryIndex::new();
        if chunks.is_empty() {
            info!(document_count = self.corpus.len(), chunk_count = 0, "indexed corpus (empty)");
            return Ok(index);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }
        for chunk in chunks {
            index.insert(chunk);
        }

        info!(
            document_count = self.corpus.len(),
            chunk_count = index.len(),
            "indexed corpus"
        );
        Ok(index)
    }

    /// Fingerprint of the corpus identity and the chunking parameters.
    /// A change invalidates the cached index.
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.config.chunk_size.hash(&mut hasher);
        self.config.chunk_overlap.hash(&mut hasher);
        for document in &self.corpus {
            document.id.hash(&mut hasher);
            document.text.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Builder for constructing a [`QaPipeline`].
///
/// Required: config, embedding provider, completion provider, corpus.
/// Optional: chunker (defaults to a [`BoundaryChunker`] built from the
/// config), template (defaults to [`PromptTemplate::default()`]), and
/// `cache_index` (defaults to rebuilding the index on every question).
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<QaConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    completion_provider: Option<Arc<dyn CompletionProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
    template: Option<PromptTemplate>,
    corpus: Option<Vec<Document>>,
    cache_index: bool,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider. Chunks and questions are embedded by
    /// this same provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the completion provider used for answer generation.
    pub fn completion_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion_provider = Some(provider);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Override the prompt template.
    pub fn template(mut self, template: PromptTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Set the document corpus the pipeline answers questions about.
    pub fn corpus(mut self, corpus: Vec<Document>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Reuse the built index across questions instead of rebuilding per
    /// question. The cache is invalidated when the corpus or the chunking
    /// parameters change.
    pub fn cache_index(mut self, enabled: bool) -> Self {
        self.cache_index = enabled;
        self
    }

    /// Build the [`QaPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::InvalidConfig`] if a required field is missing or
    /// the default chunker cannot be built from the config.
    pub fn build(self) -> Result<QaPipeline> {
        let config =
            self.config.ok_or_else(|| QaError::InvalidConfig("config is required".to_string()))?;
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            QaError::InvalidConfig("embedding_provider is required".to_string())
        })?;
        let completion_provider = self.completion_provider.ok_or_else(|| {
            QaError::InvalidConfig("completion_provider is required".to_string())
        })?;
        let corpus =
            self.corpus.ok_or_else(|| QaError::InvalidConfig("corpus is required".to_string()))?;

        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(BoundaryChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        Ok(QaPipeline {
            config,
            embedding_provider,
            completion_provider,
            chunker,
            template: self.template.unwrap_or_default(),
            corpus,
            cache: self.cache_index.then(|| RwLock::new(None)),
        })
    }
}

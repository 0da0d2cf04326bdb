//! Document segmentation.
//!
//! This module provides the [`Chunker`] trait and [`BoundaryChunker`], a
//! splitter that respects natural text boundaries (paragraphs, then
//! sentences, then words) while keeping every chunk within a fixed size
//! and overlapping consecutive chunks by a fixed amount.

use crate::document::{Chunk, Document};
use crate::error::{QaError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text, a start offset, and
/// metadata but no embeddings. Embeddings are attached later by the
/// index builder.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text. Each returned
    /// chunk has an empty embedding vector. Splitting is deterministic: the
    /// same document and parameters always produce the same sequence.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Boundary separators tried in priority order: paragraph, sentence, word.
const SEPARATOR_LEVELS: [&[&str]; 3] = [&["\n\n"], &[". ", "! ", "? "], &[" "]];

/// Splits text into overlapping chunks at natural boundaries.
///
/// Each chunk covers at most `chunk_size` characters. The cut point prefers
/// the last paragraph break inside the window, then the last sentence end,
/// then the last word break; when no boundary fits, the text is hard-split
/// at the character limit. Separators stay attached to the preceding chunk.
/// Every chunk after the first starts exactly `chunk_overlap` characters
/// before the end of the previous chunk, and records its start offset in
/// the source document.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata plus a `chunk_index` field.
///
/// # Example
///
/// ```rust,ignore
/// use fundqa_rag::BoundaryChunker;
///
/// let chunker = BoundaryChunker::new(4000, 20)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl BoundaryChunker {
    /// Create a new `BoundaryChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`QaError::InvalidConfig`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(QaError::InvalidConfig("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(QaError::InvalidConfig(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Pick the cut point for the chunk starting at `start`, bounded by
    /// `limit` (exclusive). Prefers the latest boundary in the window, by
    /// separator priority; falls back to a hard cut at `limit`.
    ///
    /// A boundary is only usable if it lies past the overlap region, so the
    /// next chunk always starts after the current one.
    fn cut_point(&self, text: &str, start: usize, limit: usize) -> usize {
        let window = &text[start..limit];
        let min_end = start + self.chunk_overlap;

        for separators in SEPARATOR_LEVELS {
            let mut best = None;
            for separator in separators {
                if let Some(pos) = window.rfind(separator) {
                    let end = start + pos + separator.len();
                    if end > min_end {
                        best = Some(best.map_or(end, |b: usize| b.max(end)));
                    }
                }
            }
            if let Some(end) = best {
                return end;
            }
        }

        limit
    }
}

/// Round `index` down to the nearest UTF-8 character boundary in `text`.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Round `index` up to the nearest UTF-8 character boundary in `text`.
fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let text = &document.text;
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let chunk_index = chunks.len();
            let mut limit = floor_char_boundary(text, (start + self.chunk_size).min(text.len()));
            if limit <= start {
                // A single character wider than chunk_size; a chunk never
                // splits a code point.
                limit = ceil_char_boundary(text, start + 1);
            }
            let end =
                if limit == text.len() { limit } else { self.cut_point(text, start, limit) };

            let mut metadata = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), chunk_index.to_string());

            chunks.push(Chunk {
                id: format!("{}_{chunk_index}", document.id),
                text: text[start..end].to_string(),
                embedding: Vec::new(),
                start_index: start,
                metadata,
                document_id: document.id.clone(),
            });

            if end == text.len() {
                break;
            }

            let next = floor_char_boundary(text, end.saturating_sub(self.chunk_overlap));
            // Multi-byte snapping can erase the forward step; never re-emit a span.
            start = if next > start { next } else { end };
        }

        chunks
    }
}

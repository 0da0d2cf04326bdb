//! Document loaders.
//!
//! Loaders read a source file once and produce one [`Document`] per logical
//! page, ready for segmentation. PDF support is behind the `pdf` feature.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::document::Document;
use crate::error::{QaError, Result};

/// Default maximum source file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// A source of documents for the pipeline.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load a file into page-level documents.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Document`] when the file is missing, too large,
    /// or cannot be parsed.
    async fn load(&self, path: &Path) -> Result<Vec<Document>>;

    /// File extensions this loader handles, lowercase, without the dot.
    fn supported_extensions(&self) -> &[&str];
}

/// Derive a document ID from the file stem and a 1-based page number.
fn document_id(path: &Path, page: usize) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    format!("{stem}_page{page}")
}

/// Build a page-level [`Document`] for text extracted from `path`.
fn page_document(path: &Path, page: usize, text: String) -> Document {
    Document {
        id: document_id(path, page),
        text,
        metadata: HashMap::from([("page".to_string(), page.to_string())]),
        source_uri: Some(path.display().to_string()),
    }
}

/// Reject files larger than `max_size` before reading them.
async fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| QaError::Document(format!("cannot stat {}: {e}", path.display())))?;
    if meta.len() > max_size {
        return Err(QaError::Document(format!(
            "{} is {} bytes, larger than the {max_size}-byte limit",
            path.display(),
            meta.len()
        )));
    }
    Ok(())
}

/// Loads plain-text files as a single-page document.
#[derive(Debug, Clone)]
pub struct TextLoader {
    max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self { max_file_size: DEFAULT_MAX_FILE_SIZE }
    }
}

impl TextLoader {
    /// Create a loader with the default size limit.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self, path: &Path) -> Result<Vec<Document>> {
        check_file_size(path, self.max_file_size).await?;

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| QaError::Document(format!("cannot read {}: {e}", path.display())))?;

        info!(path = %path.display(), bytes = text.len(), "loaded text document");
        Ok(vec![page_document(path, 1, text)])
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md"]
    }
}

/// Loads PDF files, one document per page.
///
/// Text extraction runs on a blocking thread. Pages are split at form-feed
/// boundaries when the extractor emits them; otherwise the whole file is a
/// single page. Blank pages are dropped.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone)]
pub struct PdfLoader {
    max_file_size: u64,
}

#[cfg(feature = "pdf")]
impl Default for PdfLoader {
    fn default() -> Self {
        Self { max_file_size: DEFAULT_MAX_FILE_SIZE }
    }
}

#[cfg(feature = "pdf")]
impl PdfLoader {
    /// Create a loader with the default size limit.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "pdf")]
#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, path: &Path) -> Result<Vec<Document>> {
        check_file_size(path, self.max_file_size).await?;

        let owned_path = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(&owned_path)
                .map_err(|e| QaError::Document(format!("PDF extraction failed: {e}")))
        })
        .await
        .map_err(|e| QaError::Document(format!("PDF extraction task failed: {e}")))??;

        let documents: Vec<Document> = text
            .split('\u{c}')
            .filter(|page| !page.trim().is_empty())
            .enumerate()
            .map(|(i, page)| page_document(path, i + 1, page.to_string()))
            .collect();

        if documents.is_empty() {
            return Err(QaError::Document(format!(
                "{} contains no extractable text",
                path.display()
            )));
        }

        info!(path = %path.display(), pages = documents.len(), "loaded PDF document");
        Ok(documents)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Load a corpus file, selecting the loader by file extension.
///
/// # Errors
///
/// Returns [`QaError::Document`] for unsupported extensions (including
/// `.pdf` when the `pdf` feature is disabled) and for loader failures.
pub async fn load_corpus(path: &Path) -> Result<Vec<Document>> {
    let extension =
        path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();

    match extension.as_str() {
        "txt" | "md" => TextLoader::new().load(path).await,
        #[cfg(feature = "pdf")]
        "pdf" => PdfLoader::new().load(path).await,
        other => Err(QaError::Document(format!(
            "unsupported corpus file extension '{other}' for {}",
            path.display()
        ))),
    }
}

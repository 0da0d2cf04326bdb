//! Prompt template rendering.

use crate::document::ScoredChunk;
use crate::error::{QaError, Result};

/// Placeholder for the retrieved context in a template.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Placeholder for the question text in a template.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Separator between concatenated chunk texts in the rendered context.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// The default instruction template for fund-documentation questions.
pub const DEFAULT_TEMPLATE: &str = "\
You are a specialist in FIDCs and investment funds. Answer the question below \
using the provided context.

Context: {context}

Question: {question}";

/// A validated instruction template with `{context}` and `{question}`
/// placeholders.
///
/// The template text is configuration (language, tone, domain framing), not
/// computed. Validation happens at construction so a malformed template
/// fails fast instead of at question time.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template, verifying both placeholders are present.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Template`] if `{context}` or `{question}` is missing.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for placeholder in [CONTEXT_PLACEHOLDER, QUESTION_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(QaError::Template(format!(
                    "template is missing the required {placeholder} placeholder"
                )));
            }
        }
        Ok(Self { template })
    }

    /// Render the template with retrieved chunks and the question.
    ///
    /// Chunk texts are joined with a blank line. An empty chunk list renders
    /// an empty context; the question text appears verbatim.
    pub fn render(&self, context_chunks: &[ScoredChunk], question: &str) -> String {
        let context =
            context_chunks.iter().map(|c| c.chunk.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR);

        self.template
            .replace(CONTEXT_PLACEHOLDER, &context)
            .replace(QUESTION_PLACEHOLDER, question)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        // DEFAULT_TEMPLATE carries both placeholders.
        Self { template: DEFAULT_TEMPLATE.to_string() }
    }
}

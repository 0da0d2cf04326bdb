//! Server configuration, read once from the environment at startup.

use std::time::Duration;

use anyhow::{Context, bail};

/// Process-wide configuration for the fundqa server.
///
/// Everything is resolved in [`AppConfig::from_env`] before the server
/// starts; request handling never reads ambient process state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenAI API credential. Required.
    pub api_key: String,
    /// Path to the corpus file (`.pdf`, `.txt`, or `.md`). Required.
    pub document_path: String,
    /// Bind host, default `127.0.0.1`.
    pub host: String,
    /// Bind port, default 8080.
    pub port: u16,
    /// Chat model identifier, default `gpt-3.5-turbo`.
    pub model: String,
    /// Hard cap on generated tokens per answer, default 200.
    pub max_tokens: u32,
    /// Maximum chunk size in characters, default 4000.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters, default 20.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question, default 3.
    pub top_k: usize,
    /// Timeout applied to each embedding and completion call.
    pub capability_timeout: Duration,
    /// Reuse the built index across questions instead of rebuilding per
    /// question. Default false.
    pub cache_index: bool,
}

/// Read an optional environment variable, parsed to `T`.
fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value.parse::<T>().with_context(|| format!("invalid {name}: {value}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load the configuration from the environment.
    ///
    /// `OPENAI_API_KEY` and `FUNDQA_DOCUMENT` are required; their absence is
    /// fatal at startup, not per-request.
    pub fn from_env() -> anyhow::Result<Self> {
        let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
            bail!("OPENAI_API_KEY environment variable must be set");
        };
        let Ok(document_path) = std::env::var("FUNDQA_DOCUMENT") else {
            bail!("FUNDQA_DOCUMENT environment variable must point at the corpus file");
        };

        Ok(Self {
            api_key,
            document_path,
            host: std::env::var("FUNDQA_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parsed("FUNDQA_PORT", 8080)?,
            model: std::env::var("FUNDQA_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            max_tokens: env_parsed("FUNDQA_MAX_TOKENS", 200)?,
            chunk_size: env_parsed("FUNDQA_CHUNK_SIZE", 4000)?,
            chunk_overlap: env_parsed("FUNDQA_CHUNK_OVERLAP", 20)?,
            top_k: env_parsed("FUNDQA_TOP_K", 3)?,
            capability_timeout: Duration::from_secs(env_parsed("FUNDQA_TIMEOUT_SECS", 60u64)?),
            cache_index: env_parsed("FUNDQA_CACHE_INDEX", false)?,
        })
    }
}

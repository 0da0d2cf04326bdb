//! HTTP adapter: routes, request/response envelopes, and error mapping.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use fundqa_rag::openai::{OpenAiChatProvider, OpenAiEmbeddingProvider};
use fundqa_rag::{QaConfig, QaError, QaPipeline, load_corpus};

use crate::config::AppConfig;

/// Fixed success message carried in every 200 envelope.
const SUCCESS_MESSAGE: &str = "Request completed successfully";

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QaPipeline>,
}

/// Inbound payload for `POST /ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Success envelope for `POST /ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub message: String,
    pub details: String,
}

/// Error envelope: a stable machine-readable code plus a display message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self { error: code.to_string(), message: message.into() }
    }
}

/// Map a pipeline failure to its HTTP status and stable error code.
///
/// Capability failures are upstream problems (502); configuration and corpus
/// problems are ours (500); an empty index means there is nothing to search
/// (422). Never 200.
fn error_mapping(err: &QaError) -> (StatusCode, &'static str) {
    match err {
        QaError::InvalidConfig(_) => (StatusCode::INTERNAL_SERVER_ERROR, "invalid_config"),
        QaError::EmbeddingService { .. } => (StatusCode::BAD_GATEWAY, "embedding_service_error"),
        QaError::EmptyIndex => (StatusCode::UNPROCESSABLE_ENTITY, "empty_index"),
        QaError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "template_error"),
        QaError::GenerationService { .. } => (StatusCode::BAD_GATEWAY, "generation_service_error"),
        QaError::Document(_) => (StatusCode::INTERNAL_SERVER_ERROR, "document_error"),
    }
}

/// Build the application state: load the corpus and wire the pipeline.
///
/// Runs once at startup; any failure here is fatal.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let corpus = load_corpus(Path::new(&config.document_path))
        .await
        .with_context(|| format!("failed to load corpus from {}", config.document_path))?;

    let qa_config = QaConfig::builder()
        .chunk_size(config.chunk_size)
        .chunk_overlap(config.chunk_overlap)
        .top_k(config.top_k)
        .build()?;

    let embedding_provider = OpenAiEmbeddingProvider::new(config.api_key.clone())?
        .with_timeout(config.capability_timeout);
    let completion_provider = OpenAiChatProvider::new(config.api_key.clone())?
        .with_model(config.model.clone())
        .with_max_tokens(config.max_tokens)
        .with_timeout(config.capability_timeout);

    let pipeline = QaPipeline::builder()
        .config(qa_config)
        .embedding_provider(Arc::new(embedding_provider))
        .completion_provider(Arc::new(completion_provider))
        .corpus(corpus)
        .cache_index(config.cache_index)
        .build()?;

    Ok(AppState { pipeline: Arc::new(pipeline) })
}

/// Build the router with all routes and middleware attached.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown.
pub async fn run_server(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for fundqa server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("fundqa listening on http://{addr}");
    axum::serve(listener, app_router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "fundqa"}))
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.question.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("empty_question", "question cannot be empty")),
        ));
    }

    match state.pipeline.ask(&request.question).await {
        Ok(details) => {
            Ok(Json(AskResponse { message: SUCCESS_MESSAGE.to_string(), details }))
        }
        Err(err) => {
            error!(error = %err, "question failed");
            let (status, code) = error_mapping(&err);
            Err((status, Json(ErrorResponse::new(code, err.to_string()))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_is_distinguishable_and_never_200() {
        let cases = [
            (
                QaError::InvalidConfig("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_config",
            ),
            (
                QaError::EmbeddingService { provider: "OpenAI".into(), message: "down".into() },
                StatusCode::BAD_GATEWAY,
                "embedding_service_error",
            ),
            (QaError::EmptyIndex, StatusCode::UNPROCESSABLE_ENTITY, "empty_index"),
            (
                QaError::Template("missing".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "template_error",
            ),
            (
                QaError::GenerationService { provider: "OpenAI".into(), message: "quota".into() },
                StatusCode::BAD_GATEWAY,
                "generation_service_error",
            ),
            (
                QaError::Document("unreadable".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "document_error",
            ),
        ];

        for (err, expected_status, expected_code) in cases {
            let (status, code) = error_mapping(&err);
            assert_eq!(status, expected_status, "status for {err}");
            assert_eq!(code, expected_code, "code for {err}");
            assert_ne!(status, StatusCode::OK);
        }
    }
}

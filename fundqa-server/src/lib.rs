//! HTTP adapter for the fundqa question-answering pipeline.
//!
//! Decodes inbound requests into questions, invokes [`fundqa_rag`], and
//! encodes the outcome: `200` with a `{message, details}` envelope on
//! success, or a non-200 status with a `{error, message}` envelope naming
//! the failure category.

pub mod config;
pub mod server;

pub use config::AppConfig;
pub use server::{AppState, app_router, build_state, run_server};

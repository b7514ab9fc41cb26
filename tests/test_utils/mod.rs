//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use tempfile::TempDir;

use tourmate::ai::discovery::Discovery;
use tourmate::api::AppState;
use tourmate::api::app;
use tourmate::catalog::StaticCatalog;
use tourmate::core::AppConfig;
use tourmate::core::db::ready_db;
use tourmate::gemini::GeminiClient;
use tourmate::store::{AppContext, KvStore};

/// Nothing listens here so any request to it fails fast.
pub const UNREACHABLE_LLM: &str = "http://127.0.0.1:9";

/// Creates a test application router backed by a fresh database in a
/// temporary directory. Keep the `TempDir` alive for as long as the
/// router is used.
pub async fn test_app(llm_host: &str) -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = AppConfig::with_storage_path(dir.path().to_str().unwrap());
    config.llm_api_hostname = llm_host.to_string();
    config.llm_api_key = String::from("test-api-key");
    config.llm_model = String::from("gemini-test");

    let db = ready_db(&config.db_path)
        .await
        .expect("Failed to connect to async db");

    let assistant = Arc::new(GeminiClient::new(
        &config.llm_api_hostname,
        &config.llm_api_key,
        &config.llm_model,
    ));
    let context = AppContext::load(KvStore::new(&db)).await;
    let app_state = AppState::new(
        db,
        config,
        Arc::new(StaticCatalog::seed()),
        Discovery::new(assistant),
        context,
    );
    (app(Arc::new(RwLock::new(app_state))), dir)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

/// Wrap `text` the way `generateContent` returns a completion.
pub fn completion_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    })
    .to_string()
}

use std::sync::{Arc, RwLock};

use anyhow::{Error, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::ai::discovery::Discovery;
use crate::api::state::AppState;
use crate::catalog::StaticCatalog;
use crate::core::{AppConfig, db::ready_db};
use crate::gemini::GeminiClient;
use crate::store::{AppContext, KvStore};

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<(), Error> {
    let db = ready_db(&config.db_path).await?;

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
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

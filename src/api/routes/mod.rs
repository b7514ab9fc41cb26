//! API routes module

pub mod places;
pub mod preferences;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Catalog and discovery routes
        .nest("/places", places::router())
        // Theme, language and governorate
        .nest("/preferences", preferences::router())
}

//! Router for the preferences API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::public;
use crate::api::public::{ApiError, ErrorResponse};
use crate::api::state::AppState;
use crate::catalog::Catalog;
use crate::store::Preferences;

type SharedState = Arc<RwLock<AppState>>;

async fn get_preferences(State(state): State<SharedState>) -> Json<Preferences> {
    let context = state.read().unwrap().context.clone();
    let preferences = context.lock().await.preferences().clone();
    Json(preferences)
}

/// Change any of theme, language or governorate. The request is
/// validated first and then saved as a whole, so a failed write leaves
/// every preference as it was.
async fn update_preferences(
    State(state): State<SharedState>,
    Json(update): Json<public::PreferencesUpdate>,
) -> Result<Response, ApiError> {
    let (context, catalog) = {
        let state = state.read().unwrap();
        (state.context.clone(), Arc::clone(&state.catalog))
    };

    if let Some(Some(id)) = &update.governorate
        && catalog.governorate(id).is_none()
    {
        return Ok(ErrorResponse::response(
            StatusCode::BAD_REQUEST,
            &format!("Unknown governorate: {}", id),
        ));
    }

    let mut context = context.lock().await;
    let mut preferences = context.preferences().clone();
    if let Some(theme) = update.theme {
        preferences.theme = theme;
    }
    if let Some(language) = update.language {
        preferences.language = language;
    }
    if let Some(governorate) = update.governorate {
        preferences.governorate = governorate;
    }
    context.update(preferences).await?;

    Ok(Json(context.preferences().clone()).into_response())
}

async fn toggle_theme(State(state): State<SharedState>) -> Result<Json<public::ThemeResponse>, ApiError> {
    let context = state.read().unwrap().context.clone();
    let theme = context.lock().await.toggle_theme().await?;
    Ok(Json(public::ThemeResponse { theme }))
}

/// Create the preferences router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/",
            axum::routing::get(get_preferences).post(update_preferences),
        )
        .route("/theme/toggle", axum::routing::post(toggle_theme))
}

//! Router for the places API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::public;
use crate::ai::discovery::{DEFAULT_DISCOVERY_COUNT, DiscoveryError, merge_discovered};
use crate::api::public::{ApiError, ErrorResponse};
use crate::api::state::AppState;
use crate::catalog::{Catalog, Category, PLACES_PER_TAB, Place, search};

type SharedState = Arc<RwLock<AppState>>;

const MAX_DISCOVERY_COUNT: usize = 10;

fn unknown_governorate(id: &str) -> Response {
    ErrorResponse::response(
        StatusCode::NOT_FOUND,
        &format!("Unknown governorate: {}", id),
    )
}

/// The catalog's first page for a tab followed by anything discovered.
fn listed_places(state: &AppState, governorate_id: &str, category: Category) -> Vec<Place> {
    let places = state.catalog.places(governorate_id, category);
    let shown = &places[..places.len().min(PLACES_PER_TAB)];
    merge_discovered(
        shown,
        state.discovered(governorate_id, category).to_vec(),
    )
}

async fn list_governorates(State(state): State<SharedState>) -> Json<public::GovernoratesResponse> {
    let state = state.read().unwrap();
    let governorates = state
        .catalog
        .governorates()
        .into_iter()
        .map(|g| public::GovernorateSummary {
            id: g.id.clone(),
            name: g.name.clone(),
        })
        .collect();
    Json(public::GovernoratesResponse { governorates })
}

/// List places for a governorate and category, optionally narrowed by
/// a name search
async fn list_places(
    State(state): State<SharedState>,
    Path((governorate_id, category)): Path<(String, Category)>,
    Query(params): Query<public::PlacesQuery>,
) -> Result<Response, ApiError> {
    let language = match params.language {
        Some(language) => language,
        None => {
            let context = state.read().unwrap().context.clone();
            context.lock().await.language()
        }
    };

    let state = state.read().unwrap();
    if state.catalog.governorate(&governorate_id).is_none() {
        return Ok(unknown_governorate(&governorate_id));
    }

    let listed = listed_places(&state, &governorate_id, category);
    let term = params.search.unwrap_or_default();
    let places = search(&listed, &term, language).into_iter().cloned().collect();

    Ok(Json(public::PlacesResponse {
        governorate: governorate_id,
        category,
        places,
    })
    .into_response())
}

/// Ask the assistant for more places and add them to the listing
async fn discover_places(
    State(state): State<SharedState>,
    Path((governorate_id, category)): Path<(String, Category)>,
    body: Option<Json<public::DiscoverRequest>>,
) -> Result<Response, ApiError> {
    let count = body
        .and_then(|Json(b)| b.count)
        .unwrap_or(DEFAULT_DISCOVERY_COUNT)
        .clamp(1, MAX_DISCOVERY_COUNT);

    let (discovery, governorate, existing) = {
        let state = state.read().unwrap();
        let Some(governorate) = state.catalog.governorate(&governorate_id).cloned() else {
            return Ok(unknown_governorate(&governorate_id));
        };
        let existing = listed_places(&state, &governorate_id, category);
        (state.discovery.clone(), governorate, existing)
    };

    let discovered = match discovery
        .discover(&governorate, category, &existing, count)
        .await
    {
        Ok(places) => places,
        Err(e @ DiscoveryError::InFlight { .. }) => {
            return Ok(ErrorResponse::response(StatusCode::CONFLICT, &e.to_string()));
        }
        Err(e) => {
            tracing::error!("Discovery failed: {}", e);
            return Ok(ErrorResponse::response(StatusCode::BAD_GATEWAY, &e.to_string()));
        }
    };

    let places = {
        let mut state = state.write().unwrap();
        state
            .discovered
            .entry((governorate_id.clone(), category))
            .or_default()
            .extend(discovered.iter().cloned());
        listed_places(&state, &governorate_id, category)
    };

    Ok(Json(public::DiscoverResponse { discovered, places }).into_response())
}

/// Create the places router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(list_governorates))
        .route("/{governorate}/{category}", axum::routing::get(list_places))
        .route(
            "/{governorate}/{category}/discover",
            axum::routing::post(discover_places),
        )
}

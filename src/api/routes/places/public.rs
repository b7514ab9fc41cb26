//! Public types for the places API
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Language, LocalizedString, Place};

#[derive(Serialize, Deserialize, Debug)]
pub struct GovernorateSummary {
    pub id: String,
    pub name: LocalizedString,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GovernoratesResponse {
    pub governorates: Vec<GovernorateSummary>,
}

/// Query parameters for listing places
#[derive(Deserialize, Debug, Default)]
pub struct PlacesQuery {
    pub search: Option<String>,
    /// Language the search term is matched in. Defaults to the saved
    /// preference.
    pub language: Option<Language>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PlacesResponse {
    pub governorate: String,
    pub category: Category,
    pub places: Vec<Place>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DiscoverRequest {
    pub count: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DiscoverResponse {
    /// Only the places found by this request
    pub discovered: Vec<Place>,
    /// Everything now listed for the category
    pub places: Vec<Place>,
}

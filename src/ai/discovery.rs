//! Ask the assistant for more places in a governorate than the catalog
//! lists. Results are validated, de-duplicated and tagged as
//! AI-generated before the caller merges them into its list.
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::ai::prompt::{Prompt, templates};
use crate::catalog::{Category, Governorate, Language, LocalizedString, Place};
use crate::gemini::{Assistant, AssistantRequest};

/// Ratings outside this range are pulled back into it. This is a
/// product choice rather than anything the model guarantees.
pub const DISCOVERY_RATING_RANGE: RangeInclusive<f32> = 3.5..=5.0;

pub const DEFAULT_DISCOVERY_COUNT: usize = 5;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum DiscoveryError {
    #[error("Discovery already running for {category} in {governorate}")]
    InFlight {
        governorate: String,
        category: Category,
    },
    #[error("Discovery request failed: {0}")]
    RequestFailed(String),
    #[error("Malformed discovery response: {0}")]
    MalformedResponse(String),
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DiscoveredPlace {
    name: LocalizedString,
    short_description: LocalizedString,
    #[serde(default)]
    long_description: Option<LocalizedString>,
    rating: f32,
}

type InFlightKey = (String, Category);

/// Releases an in-flight key however the request ends.
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<InFlightKey>>>,
    key: InFlightKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

#[derive(Clone)]
pub struct Discovery {
    assistant: Arc<dyn Assistant>,
    in_flight: Arc<Mutex<HashSet<InFlightKey>>>,
}

impl Discovery {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            assistant,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn acquire(&self, governorate: &str, category: Category) -> Result<InFlightGuard, DiscoveryError> {
        let key = (governorate.to_string(), category);
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|e| DiscoveryError::RequestFailed(e.to_string()))?;
        if !in_flight.insert(key.clone()) {
            return Err(DiscoveryError::InFlight {
                governorate: governorate.to_string(),
                category,
            });
        }
        Ok(InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }

    pub fn is_running(&self, governorate: &str, category: Category) -> bool {
        self.in_flight
            .lock()
            .map(|in_flight| in_flight.contains(&(governorate.to_string(), category)))
            .unwrap_or(false)
    }

    /// Request up to `count` places in `category` that aren't already in
    /// `existing`. Only one request per governorate and category runs
    /// at a time, a second one fails with `InFlight`. Asking for zero
    /// places returns nothing without calling the assistant.
    pub async fn discover(
        &self,
        governorate: &Governorate,
        category: Category,
        existing: &[Place],
        count: usize,
    ) -> Result<Vec<Place>, DiscoveryError> {
        if count == 0 {
            return Ok(vec![]);
        }
        let _guard = self.acquire(&governorate.id, category)?;
        let governorate_name = governorate.name.get(Language::En);

        let prompt = discovery_prompt(governorate_name, category, existing, count)?;
        tracing::debug!("Discovering {} in {}", category, governorate.id);
        let response = self
            .assistant
            .generate(&AssistantRequest::json(&prompt))
            .await
            .map_err(|e| {
                tracing::error!("Discovery request failed: {:?}", e);
                DiscoveryError::RequestFailed(e.to_string())
            })?;

        let places = parse_places(&response, governorate_name, existing, count)?;
        tracing::debug!("Discovered {} {} in {}", places.len(), category, governorate.id);
        Ok(places)
    }
}

fn discovery_prompt(
    governorate: &str,
    category: Category,
    existing: &[Place],
    count: usize,
) -> Result<String, DiscoveryError> {
    let existing: Vec<&str> = existing.iter().map(|p| p.name.get(Language::En)).collect();
    let languages: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
    templates()
        .render(
            &Prompt::Discovery.to_string(),
            &json!({
                "count": count,
                "category": category.describe(),
                "governorate": governorate,
                "existing": existing,
                "languages": languages,
            }),
        )
        .map_err(|e| DiscoveryError::RequestFailed(e.to_string()))
}

/// Models like to wrap JSON in a Markdown code fence even when asked not
/// to.
fn strip_code_fence(text: &str) -> &str {
    let fence_re = Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").unwrap();
    match fence_re.captures(text).and_then(|c| c.get(1)) {
        Some(body) => body.as_str(),
        None => text.trim(),
    }
}

fn parse_places(
    response: &str,
    governorate: &str,
    existing: &[Place],
    count: usize,
) -> Result<Vec<Place>, DiscoveryError> {
    let body = strip_code_fence(response);
    let items: Vec<Value> = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Discovery response is not a JSON array: {}\n{}", e, body);
        DiscoveryError::MalformedResponse(e.to_string())
    })?;

    let mut seen: HashSet<String> = existing
        .iter()
        .map(|p| p.name.get(Language::En).trim().to_lowercase())
        .collect();

    let mut places = Vec::new();
    for item in items {
        if places.len() >= count {
            break;
        }
        let discovered: DiscoveredPlace = match serde_json::from_value(item) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Skipping discovered place: {}", e);
                continue;
            }
        };
        let key = discovered.name.en.trim().to_lowercase();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        places.push(into_place(discovered, governorate));
    }
    Ok(places)
}

fn clamp_rating(rating: f32) -> f32 {
    if rating.is_nan() {
        return *DISCOVERY_RATING_RANGE.start();
    }
    rating.clamp(*DISCOVERY_RATING_RANGE.start(), *DISCOVERY_RATING_RANGE.end())
}

fn into_place(discovered: DiscoveredPlace, governorate: &str) -> Place {
    let query = format!("{}, {}", discovered.name.en.trim(), governorate);
    Place {
        id: format!("ai-{}", Uuid::new_v4()),
        images: vec![],
        short_description: discovered.short_description,
        long_description: discovered.long_description,
        rating: clamp_rating(discovered.rating),
        average_price: None,
        contact_number: None,
        google_maps_url: format!("{}{}", MAPS_SEARCH_URL, urlencoding::encode(&query)),
        ai_generated: true,
        name: discovered.name,
    }
}

/// Append discovered places after the existing ones, skipping any whose
/// id is already listed.
pub fn merge_discovered(existing: &[Place], discovered: Vec<Place>) -> Vec<Place> {
    let ids: HashSet<&str> = existing.iter().map(|p| p.id.as_str()).collect();
    let fresh: Vec<Place> = discovered
        .into_iter()
        .filter(|p| !ids.contains(p.id.as_str()))
        .collect();
    existing.iter().cloned().chain(fresh).collect()
}

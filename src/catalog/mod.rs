//! Read-only lookup of governorates and their places.
pub mod models;
mod seed;

pub use models::*;

/// Maximum number of places shown for one category tab.
pub const PLACES_PER_TAB: usize = 10;

pub trait Catalog: Send + Sync {
    fn governorates(&self) -> Vec<&Governorate>;

    fn governorate(&self, id: &str) -> Option<&Governorate>;

    /// Places for a governorate and category in catalog order. Unknown
    /// governorates have no places.
    fn places(&self, governorate_id: &str, category: Category) -> &[Place] {
        self.governorate(governorate_id)
            .map(|g| g.places(category))
            .unwrap_or(&[])
    }
}

pub struct StaticCatalog {
    governorates: Vec<Governorate>,
}

impl StaticCatalog {
    pub fn new(governorates: Vec<Governorate>) -> Self {
        Self { governorates }
    }

    pub fn seed() -> Self {
        Self::new(seed::governorates())
    }
}

impl Catalog for StaticCatalog {
    fn governorates(&self) -> Vec<&Governorate> {
        self.governorates.iter().collect()
    }

    fn governorate(&self, id: &str) -> Option<&Governorate> {
        self.governorates.iter().find(|g| g.id == id)
    }
}

/// Filter `places` by a case-insensitive substring of the name in
/// `language`. An empty term matches everything.
pub fn search<'a>(places: &'a [Place], term: &str, language: Language) -> Vec<&'a Place> {
    let term = term.trim().to_lowercase();
    places
        .iter()
        .filter(|p| term.is_empty() || p.name.get(language).to_lowercase().contains(&term))
        .collect()
}

/// The places listed on a category tab: the first `PLACES_PER_TAB`
/// catalog entries narrowed by `term`.
pub fn listing<'a>(
    catalog: &'a dyn Catalog,
    governorate_id: &str,
    category: Category,
    term: &str,
    language: Language,
) -> Vec<&'a Place> {
    let places = catalog.places(governorate_id, category);
    let shown = &places[..places.len().min(PLACES_PER_TAB)];
    search(shown, term, language)
}

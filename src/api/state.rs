use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_rusqlite::Connection;

use crate::ai::discovery::Discovery;
use crate::catalog::{Catalog, Category, Place};
use crate::core::AppConfig;
use crate::store::AppContext;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    pub catalog: Arc<dyn Catalog>,
    pub discovery: Discovery,
    // Preferences are written through to the store so writes have to
    // wait on the db
    pub context: Arc<Mutex<AppContext>>,
    // Places found by discovery, keyed by governorate id and category
    pub discovered: HashMap<(String, Category), Vec<Place>>,
}

impl AppState {
    pub fn new(
        db: Connection,
        config: AppConfig,
        catalog: Arc<dyn Catalog>,
        discovery: Discovery,
        context: AppContext,
    ) -> Self {
        Self {
            db,
            config,
            catalog,
            discovery,
            context: Arc::new(Mutex::new(context)),
            discovered: HashMap::new(),
        }
    }

    pub fn discovered(&self, governorate_id: &str, category: Category) -> &[Place] {
        self.discovered
            .get(&(governorate_id.to_string(), category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

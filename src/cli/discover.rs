use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::ai::discovery::{Discovery, DiscoveryError};
use crate::catalog::{Catalog, Category, StaticCatalog};
use crate::core::db::ready_db;
use crate::core::{AppConfig, i18n};
use crate::gemini::GeminiClient;
use crate::store::{AppContext, KvStore};

pub async fn run(
    config: &AppConfig,
    governorate_id: &str,
    category: Category,
    count: usize,
) -> Result<()> {
    let db = ready_db(&config.db_path).await?;
    let context = AppContext::load(KvStore::new(&db)).await;
    let language = context.language();
    let catalog = StaticCatalog::seed();
    let governorate = catalog
        .governorate(governorate_id)
        .ok_or(anyhow!("Unknown governorate: {}", governorate_id))?;

    let discovery = Discovery::new(Arc::new(GeminiClient::new(
        &config.llm_api_hostname,
        &config.llm_api_key,
        &config.llm_model,
    )));

    match discovery
        .discover(governorate, category, governorate.places(category), count)
        .await
    {
        Ok(places) if places.is_empty() => println!("{}", context.t(i18n::NO_RESULTS)),
        Ok(places) => {
            for place in places {
                println!(
                    "{} ({:.1}) [AI]\n  {}\n  {}",
                    place.name.get(language),
                    place.rating,
                    place.description(language),
                    place.google_maps_url
                );
            }
        }
        Err(DiscoveryError::InFlight { .. }) => println!("{}", context.t(i18n::DISCOVERY_BUSY)),
        Err(e) => {
            tracing::debug!("{}", e);
            println!("{}", context.t(i18n::DISCOVERY_ERROR));
        }
    }
    Ok(())
}

use anyhow::Result;

use crate::catalog::{Catalog, Category, StaticCatalog, listing};
use crate::core::db::ready_db;
use crate::core::{AppConfig, i18n};
use crate::store::{AppContext, KvStore};

pub async fn run(
    config: &AppConfig,
    governorate: Option<&str>,
    category: Category,
    search: &str,
) -> Result<()> {
    let db = ready_db(&config.db_path).await?;
    let context = AppContext::load(KvStore::new(&db)).await;
    let language = context.language();
    let catalog = StaticCatalog::seed();

    // Fall back to the last selected governorate
    let Some(governorate) = governorate.or(context.preferences().governorate.as_deref()) else {
        for g in catalog.governorates() {
            println!("{}\t{}", g.id, g.name.get(language));
        }
        return Ok(());
    };

    if catalog.governorate(governorate).is_none() {
        anyhow::bail!("Unknown governorate: {}", governorate);
    }

    let places = listing(&catalog, governorate, category, search, language);
    if places.is_empty() {
        println!("{}", context.t(i18n::NO_RESULTS));
    }
    for place in places {
        println!(
            "{} ({:.1})\n  {}\n  {}",
            place.name.get(language),
            place.rating,
            place.short_description.get(language),
            place.google_maps_url
        );
    }
    Ok(())
}

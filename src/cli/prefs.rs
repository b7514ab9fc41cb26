use anyhow::Result;

use crate::catalog::{Catalog, Language, StaticCatalog};
use crate::core::AppConfig;
use crate::core::db::ready_db;
use crate::store::{AppContext, KvStore, Theme};

pub async fn run(
    config: &AppConfig,
    theme: Option<Theme>,
    language: Option<Language>,
    governorate: Option<String>,
) -> Result<()> {
    let db = ready_db(&config.db_path).await?;
    let mut context = AppContext::load(KvStore::new(&db)).await;

    if let Some(id) = &governorate
        && StaticCatalog::seed().governorate(id).is_none()
    {
        anyhow::bail!("Unknown governorate: {}", id);
    }

    let mut preferences = context.preferences().clone();
    if let Some(theme) = theme {
        preferences.theme = theme;
    }
    if let Some(language) = language {
        preferences.language = language;
    }
    if governorate.is_some() {
        preferences.governorate = governorate;
    }
    if preferences != *context.preferences() {
        context.update(preferences).await?;
    }

    let prefs = context.preferences();
    println!("theme: {}", prefs.theme);
    println!("language: {}", prefs.language);
    println!(
        "governorate: {}",
        prefs.governorate.as_deref().unwrap_or("-")
    );
    Ok(())
}

//! Application-wide preferences (theme, language, selected
//! governorate) kept in sync with the key-value store.
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::KvStore;
use crate::catalog::Language;
use crate::core::i18n;

pub const THEME_KEY: &str = "tourmate-theme";
pub const LANGUAGE_KEY: &str = "tourmate-language";
pub const GOVERNORATE_KEY: &str = "tourmate-governorate";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Unknown theme: {}", s)),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    pub governorate: Option<String>,
}

impl Preferences {
    pub async fn load(store: &KvStore) -> Self {
        Self {
            theme: store.get(THEME_KEY, Theme::default()).await,
            language: store.get(LANGUAGE_KEY, Language::default()).await,
            governorate: store.get(GOVERNORATE_KEY, None).await,
        }
    }

    pub async fn save(&self, store: &KvStore) -> Result<(), Error> {
        store
            .set_many(vec![
                (THEME_KEY, serde_json::to_value(self.theme)?),
                (LANGUAGE_KEY, serde_json::to_value(self.language)?),
                (GOVERNORATE_KEY, serde_json::to_value(&self.governorate)?),
            ])
            .await
    }
}

/// The single process-wide state object. Created once at startup and
/// passed to whatever needs to read or change preferences; every change
/// is written through to the store.
pub struct AppContext {
    store: KvStore,
    preferences: Preferences,
}

impl AppContext {
    pub async fn load(store: KvStore) -> Self {
        let preferences = Preferences::load(&store).await;
        tracing::debug!("Loaded preferences: {:?}", preferences);
        Self { store, preferences }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn language(&self) -> Language {
        self.preferences.language
    }

    /// Translate `key` into the current language.
    pub fn t(&self, key: &str) -> String {
        i18n::t(self.preferences.language, key)
    }

    pub async fn toggle_theme(&mut self) -> Result<Theme, Error> {
        let theme = self.preferences.theme.toggled();
        self.store.set(THEME_KEY, &theme).await?;
        self.preferences.theme = theme;
        Ok(theme)
    }

    /// Replace every preference at once. Nothing changes, in the store
    /// or in memory, unless all of it is saved.
    pub async fn update(&mut self, preferences: Preferences) -> Result<(), Error> {
        preferences.save(&self.store).await?;
        tracing::debug!("Updated preferences: {:?}", preferences);
        self.preferences = preferences;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_db;

    #[test]
    fn test_theme_parsing() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().to_string(), "light");
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[tokio::test]
    async fn test_defaults_when_store_is_empty() {
        let store = KvStore::new(&memory_db().await);
        let prefs = Preferences::load(&store).await;
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.governorate, None);
    }

    #[tokio::test]
    async fn test_changes_survive_reload() -> Result<()> {
        let db = memory_db().await;
        let mut ctx = AppContext::load(KvStore::new(&db)).await;
        assert_eq!(ctx.toggle_theme().await?, Theme::Dark);
        ctx.update(Preferences {
            language: Language::Ar,
            governorate: Some(String::from("giza")),
            ..ctx.preferences().clone()
        })
        .await?;

        let reloaded = AppContext::load(KvStore::new(&db)).await;
        assert_eq!(reloaded.preferences().theme, Theme::Dark);
        assert_eq!(reloaded.language(), Language::Ar);
        assert_eq!(reloaded.preferences().governorate.as_deref(), Some("giza"));
        Ok(())
    }

    #[tokio::test]
    async fn test_translation_follows_language() -> Result<()> {
        let mut ctx = AppContext::load(KvStore::new(&memory_db().await)).await;
        ctx.update(Preferences {
            language: Language::Fr,
            ..Preferences::default()
        })
        .await?;
        assert_eq!(ctx.t(i18n::NO_RESULTS), "Aucun lieu trouvé.");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_update_changes_nothing() -> Result<()> {
        let db = memory_db().await;
        db.call(|conn| {
            conn.execute_batch(&format!(
                "CREATE TRIGGER reject_governorate BEFORE INSERT ON kv WHEN NEW.key = '{}'
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
                GOVERNORATE_KEY
            ))?;
            Ok(())
        })
        .await?;

        let mut ctx = AppContext::load(KvStore::new(&db)).await;
        let result = ctx
            .update(Preferences {
                theme: Theme::Dark,
                language: Language::De,
                governorate: Some(String::from("giza")),
            })
            .await;
        assert!(result.is_err());
        assert_eq!(ctx.preferences(), &Preferences::default());

        let reloaded = AppContext::load(KvStore::new(&db)).await;
        assert_eq!(reloaded.preferences(), &Preferences::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_writes_every_key() -> Result<()> {
        let store = KvStore::new(&memory_db().await);
        let prefs = Preferences {
            theme: Theme::Dark,
            language: Language::It,
            governorate: Some(String::from("aswan")),
        };
        prefs.save(&store).await?;
        assert_eq!(Preferences::load(&store).await, prefs);
        Ok(())
    }
}

//! Persisted key-value store. Values are stored as JSON strings so
//! any serializable type can be kept under a key and survive
//! restarts.
pub mod preferences;

pub use preferences::{AppContext, Preferences, Theme};

use anyhow::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use rusqlite::OptionalExtension;
use tokio_rusqlite::{Connection, params};

#[derive(Clone)]
pub struct KvStore {
    db: Connection,
}

impl KvStore {
    pub fn new(db: &Connection) -> Self {
        Self { db: db.clone() }
    }

    /// Read the raw JSON stored under `key`.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_owned();
        let value = self
            .db
            .call(move |conn| {
                let value = conn
                    .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
                        row.get::<_, String>(0)
                    })
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    /// Read the value under `key`, or `default` if there is none or
    /// it can't be read back as a `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_raw(key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Error reading store key \"{}\": {}", key, e);
                default
            }),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("Error reading store key \"{}\": {}", key, e);
                default
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        let key = key.to_owned();
        let data = serde_json::to_string(value)?;
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, data],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Write several keys in one transaction. Either every value is
    /// saved or none is.
    pub async fn set_many(&self, entries: Vec<(&str, serde_json::Value)>) -> Result<(), Error> {
        let rows = entries
            .into_iter()
            .map(|(key, value)| Ok((key.to_owned(), serde_json::to_string(&value)?)))
            .collect::<Result<Vec<(String, String)>, Error>>()?;
        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (key, data) in rows {
                    tx.execute(
                        "INSERT INTO kv (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        params![key, data],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

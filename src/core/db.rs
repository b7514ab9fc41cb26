//! SQLite connection helpers shared by the key-value store and
//! transcript persistence.
use std::fs;
use std::path::Path;

use anyhow::{Error, Result};
use rusqlite::Connection as SyncConnection;
use tokio_rusqlite::Connection;

pub const DB_FILENAME: &str = "tourmate.sqlite";

/// Open (and create if needed) the database that lives in directory
/// `db_path`.
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    fs::create_dir_all(db_path)?;
    let path = Path::new(db_path).join(DB_FILENAME);
    let db = Connection::open(path).await?;
    Ok(db)
}

/// Create all tables. Safe to run repeatedly.
pub fn initialize_db(conn: &mut SyncConnection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "BEGIN;
         CREATE TABLE IF NOT EXISTS kv (
             key TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS chat_message (
             id TEXT PRIMARY KEY,
             session_id TEXT NOT NULL,
             position INTEGER NOT NULL,
             data TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS chat_message_session_idx
             ON chat_message (session_id, position);
         COMMIT;",
    )
}

/// Opens the database and makes sure the schema exists.
pub async fn ready_db(db_path: &str) -> Result<Connection, Error> {
    let db = async_db(db_path).await?;
    migrate(&db).await?;
    Ok(db)
}

pub async fn migrate(db: &Connection) -> Result<(), Error> {
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_db_is_idempotent() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db = ready_db(temp_dir.path().to_str().unwrap()).await?;
        migrate(&db).await?;

        let tables = db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
                )?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .filter_map(std::result::Result::ok)
                    .collect::<Vec<String>>();
                Ok(rows)
            })
            .await?;

        assert_eq!(tables, vec!["chat_message", "kv"]);
        Ok(())
    }
}

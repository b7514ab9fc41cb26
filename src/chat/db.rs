use anyhow::{Error, Result};
use serde_json::json;
use tokio_rusqlite::Connection;

use crate::ai::session::ChatMessage;

/// Store the finished messages of a session, replacing whatever was
/// saved for it before. Pending messages are skipped and local image
/// references are stripped since they mean nothing outside the session.
pub async fn save_transcript(
    db: &Connection,
    session_id: &str,
    messages: &[ChatMessage],
) -> Result<usize, Error> {
    let s_id = session_id.to_owned();
    let rows: Vec<(String, String)> = messages
        .iter()
        .filter_map(ChatMessage::persistable)
        .map(|msg| (msg.id.to_string(), json!(msg).to_string()))
        .collect();

    let count = db
        .call(move |conn| {
            // Replace the whole transcript or nothing
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM chat_message WHERE session_id = ?", [&s_id])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO chat_message (id, session_id, position, data) VALUES (?, ?, ?, ?)",
                )?;
                for (position, (id, data)) in rows.iter().enumerate() {
                    stmt.execute(tokio_rusqlite::params![id, s_id, position as i64, data])?;
                }
            }
            tx.commit()?;
            Ok(rows.len())
        })
        .await?;

    Ok(count)
}

pub async fn find_transcript(db: &Connection, session_id: &str) -> Result<Vec<ChatMessage>, Error> {
    let s_id = session_id.to_owned();
    let history = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT data FROM chat_message WHERE session_id = ? ORDER BY position",
            )?;
            let rows = stmt
                .query_map([s_id], |i| i.get::<_, String>(0))?
                .filter_map(Result::ok)
                .collect::<Vec<String>>();
            Ok(rows)
        })
        .await?;

    let messages = history
        .iter()
        .filter_map(|data| {
            serde_json::from_str::<ChatMessage>(data)
                .inspect_err(|e| tracing::warn!("Skipping unreadable chat message: {}", e))
                .ok()
        })
        .collect();
    Ok(messages)
}

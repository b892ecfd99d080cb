// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat history queries. Entries are append-only and ordered by rowid.

use chatscreen_core::ChatscreenError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{ChatEntry, EntryId};

/// Append one exchange and return its id.
pub async fn append(
    db: &Database,
    username: &str,
    user_message: &str,
    ai_response: &str,
) -> Result<EntryId, ChatscreenError> {
    let username = username.to_string();
    let user_message = user_message.to_string();
    let ai_response = ai_response.to_string();
    db.connection()
        .call(move |conn| -> Result<EntryId, rusqlite::Error> {
            conn.execute(
                "INSERT INTO chat_history (username, user_message, ai_response)
                 VALUES (?1, ?2, ?3)",
                params![username, user_message, ai_response],
            )?;
            Ok(EntryId(conn.last_insert_rowid()))
        })
        .await
        .map_err(map_tr_err)
}

/// Every entry for `username`, in insertion order.
pub async fn entries_for(db: &Database, username: &str) -> Result<Vec<ChatEntry>, ChatscreenError> {
    let username = username.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<ChatEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, username, user_message, ai_response, created_at
                 FROM chat_history WHERE username = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![username], |row| {
                Ok(ChatEntry {
                    id: EntryId(row.get(0)?),
                    username: row.get(1)?,
                    user_message: row.get(2)?,
                    ai_response: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("history.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn entries_come_back_in_insertion_order() {
        let (db, _dir) = setup_db().await;

        let a = append(&db, "alice", "hi", "hello").await.unwrap();
        let b = append(&db, "alice", "how are you?", "fine").await.unwrap();
        let c = append(&db, "alice", "bye", "goodbye").await.unwrap();
        assert!(a.0 < b.0 && b.0 < c.0);

        let entries = entries_for(&db, "alice").await.unwrap();
        let messages: Vec<_> = entries.iter().map(|e| e.user_message.as_str()).collect();
        assert_eq!(messages, vec!["hi", "how are you?", "bye"]);
        assert_eq!(entries[2].ai_response, "goodbye");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn entries_are_filtered_by_username() {
        let (db, _dir) = setup_db().await;
        append(&db, "alice", "a1", "r1").await.unwrap();
        append(&db, "bob", "b1", "r2").await.unwrap();
        append(&db, "alice", "a2", "r3").await.unwrap();

        let alice = entries_for(&db, "alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|e| e.username == "alice"));

        assert!(entries_for(&db, "carol").await.unwrap().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn history_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("durable.db");
        let path = path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        append(&db, "Anonymous", "ping", "pong").await.unwrap();
        db.close().await.unwrap();

        let db = Database::open(path).await.unwrap();
        let entries = entries_for(&db, "Anonymous").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ai_response, "pong");
        db.close().await.unwrap();
    }
}

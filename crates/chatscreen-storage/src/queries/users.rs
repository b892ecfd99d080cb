// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account queries.

use chatscreen_core::ChatscreenError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, is_unique_violation, map_tr_err};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, password_hash, age, created_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        age: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a new user.
///
/// Uniqueness is decided by the `UNIQUE` constraint inside the insert, so of
/// two racing inserts for one username exactly one wins; the other gets
/// [`ChatscreenError::AlreadyExists`].
pub async fn create_user(
    db: &Database,
    username: &str,
    password_hash: &str,
) -> Result<User, ChatscreenError> {
    let name = username.to_string();
    let hash = password_hash.to_string();
    let created = db
        .connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            match conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                params![name, hash],
            ) {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => return Ok(None),
                Err(e) => return Err(e),
            }
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .map(Some)
        })
        .await
        .map_err(map_tr_err)?;

    created.ok_or_else(|| ChatscreenError::AlreadyExists {
        username: username.to_string(),
    })
}

/// Look up a user by exact username.
pub async fn find_user(db: &Database, username: &str) -> Result<Option<User>, ChatscreenError> {
    let name = username.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                params![name],
                row_to_user,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a user's password hash.
pub async fn update_password(
    db: &Database,
    username: &str,
    password_hash: &str,
) -> Result<(), ChatscreenError> {
    let name = username.to_string();
    let hash = password_hash.to_string();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE users SET password_hash = ?1 WHERE username = ?2",
                params![hash, name],
            )
        })
        .await
        .map_err(map_tr_err)?;
    require_row(changed, username)
}

/// Set a user's age.
pub async fn update_age(db: &Database, username: &str, age: u32) -> Result<(), ChatscreenError> {
    let name = username.to_string();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE users SET age = ?1 WHERE username = ?2",
                params![age, name],
            )
        })
        .await
        .map_err(map_tr_err)?;
    require_row(changed, username)
}

fn require_row(changed: usize, username: &str) -> Result<(), ChatscreenError> {
    if changed == 0 {
        return Err(ChatscreenError::NotFound {
            username: username.to_string(),
        });
    }
    Ok(())
}

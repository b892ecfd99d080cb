// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!`
//! and applied every time the database is opened.

use chatscreen_core::ChatscreenError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply all pending migrations. Refinery records applied versions in
/// `refinery_schema_history`, so this is idempotent.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), ChatscreenError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(ChatscreenError::storage)?;
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Chatscreen.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! connection via `tokio-rusqlite`, and typed queries for user accounts and
//! chat history.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::*;

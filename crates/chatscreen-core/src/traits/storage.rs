// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits: backend lifecycle, the credential store and the chat
//! history store.

use async_trait::async_trait;

use crate::error::ChatscreenError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatTurn, EntryId, User};

/// Lifecycle of a storage backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (open, PRAGMAs, migrations).
    async fn initialize(&self) -> Result<(), ChatscreenError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ChatscreenError>;
}

/// Durable mapping of username to credentials and profile attributes.
///
/// Username uniqueness is enforced by the store itself, so concurrent
/// `create_user` calls for one username cannot both succeed.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Inserts a new user. Fails with [`ChatscreenError::AlreadyExists`] when
    /// the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str)
        -> Result<User, ChatscreenError>;

    /// Looks up a user by username.
    async fn find_user(&self, username: &str) -> Result<Option<User>, ChatscreenError>;

    /// Replaces the stored password hash. Fails with
    /// [`ChatscreenError::NotFound`] for an unknown username.
    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), ChatscreenError>;

    /// Sets the user's age. Fails with [`ChatscreenError::NotFound`] for an
    /// unknown username.
    async fn update_age(&self, username: &str, age: u32) -> Result<(), ChatscreenError>;
}

/// Append-only per-user log of prompt/response pairs.
#[async_trait]
pub trait ChatHistoryStore: Send + Sync + 'static {
    /// Appends an exchange and returns its insertion-ordered id.
    async fn append(
        &self,
        username: &str,
        user_message: &str,
        ai_response: &str,
    ) -> Result<EntryId, ChatscreenError>;

    /// Returns every exchange for `username`, oldest first.
    async fn history_for(&self, username: &str) -> Result<Vec<ChatTurn>, ChatscreenError>;
}

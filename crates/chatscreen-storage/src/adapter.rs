// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use chatscreen_config::model::StorageConfig;
use chatscreen_core::{
    AdapterType, ChatHistoryStore, ChatscreenError, ChatTurn, CredentialStore, EntryId,
    HealthStatus, PluginAdapter, StorageAdapter, User,
};

use crate::database::{self, Database};
use crate::queries;

/// SQLite-backed credential and chat history store.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// operation fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a store for the configured path. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ChatscreenError> {
        self.db.get().ok_or_else(|| ChatscreenError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatscreenError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatscreenError> {
        if let Some(db) = self.db.get() {
            database::checkpoint(db.connection()).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ChatscreenError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ChatscreenError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ChatscreenError> {
        database::checkpoint(self.db()?.connection()).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteStorage {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, ChatscreenError> {
        queries::users::create_user(self.db()?, username, password_hash).await
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, ChatscreenError> {
        queries::users::find_user(self.db()?, username).await
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), ChatscreenError> {
        queries::users::update_password(self.db()?, username, password_hash).await
    }

    async fn update_age(&self, username: &str, age: u32) -> Result<(), ChatscreenError> {
        queries::users::update_age(self.db()?, username, age).await
    }
}

#[async_trait]
impl ChatHistoryStore for SqliteStorage {
    async fn append(
        &self,
        username: &str,
        user_message: &str,
        ai_response: &str,
    ) -> Result<EntryId, ChatscreenError> {
        queries::chat_history::append(self.db()?, username, user_message, ai_response).await
    }

    async fn history_for(&self, username: &str) -> Result<Vec<ChatTurn>, ChatscreenError> {
        let entries = queries::chat_history::entries_for(self.db()?, username).await?;
        Ok(entries.into_iter().map(ChatTurn::from).collect())
    }
}

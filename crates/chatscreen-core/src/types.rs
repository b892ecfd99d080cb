// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the stores, services and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Insertion-ordered identifier of a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub i64);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Provider,
    Transcriber,
}

/// How the client captured its utterance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Typed text, used as-is.
    Text,
    /// Captured audio, already turned into text by a transcriber.
    Mic,
}

/// A stored user account.
///
/// `Debug` output omits the password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
    pub age: Option<u32>,
    pub created_at: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .field("age", &self.age)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public profile attributes of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub age: Option<u32>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            age: user.age,
        }
    }
}

/// A persisted chat exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: EntryId,
    pub username: String,
    pub user_message: String,
    pub ai_response: String,
    pub created_at: String,
}

/// One prompt/response pair as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub ai: String,
}

impl From<ChatEntry> for ChatTurn {
    fn from(entry: ChatEntry) -> Self {
        Self {
            user: entry.user_message,
            ai: entry.ai_response,
        }
    }
}

/// The result of a conversation submission: the latest response plus the
/// full, oldest-first history for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub message: String,
    pub chat_history: Vec<ChatTurn>,
}

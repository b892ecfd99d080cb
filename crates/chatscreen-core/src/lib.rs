// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Chatscreen.
//!
//! This crate provides the trait definitions, error types, and domain types
//! used throughout the workspace. Stores, the generation provider and the
//! transcriber all implement traits defined here, and services only ever
//! hold them as trait objects.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AuthError, ChatscreenError, InputError};
pub use types::{
    AdapterType, ChatEntry, ChatTurn, EntryId, HealthStatus, InputMethod, Transcript, User,
    UserProfile,
};

pub use traits::{
    ChatHistoryStore, CredentialStore, GenerationProvider, PluginAdapter, StorageAdapter,
    Transcriber,
};

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the Chatscreen collaborators.
//!
//! All adapters that carry a lifecycle extend [`PluginAdapter`].

pub mod adapter;
pub mod provider;
pub mod storage;
pub mod transcriber;

pub use adapter::PluginAdapter;
pub use provider::GenerationProvider;
pub use storage::{ChatHistoryStore, CredentialStore, StorageAdapter};
pub use transcriber::Transcriber;

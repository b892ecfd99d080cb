// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all lifecycle-bearing adapters implement.

use async_trait::async_trait;

use crate::error::ChatscreenError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for Chatscreen adapters.
///
/// Provides identity, health check, and shutdown for anything the server
/// owns for its whole lifetime (storage, generation provider).
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, ChatscreenError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), ChatscreenError>;
}

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatscreen serve` implementation.
//!
//! Wires storage, services and the gateway together, then serves until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use chatscreen_auth::AuthService;
use chatscreen_config::ChatscreenConfig;
use chatscreen_conversation::{CapturedTranscriber, ConversationService};
use chatscreen_core::{ChatscreenError, PluginAdapter, StorageAdapter};
use chatscreen_gateway::{AppState, SessionKey};
use chatscreen_gemini::GeminiProvider;
use chatscreen_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the server until SIGINT or SIGTERM, then checkpoints the database.
pub async fn run_serve(config: ChatscreenConfig) -> Result<(), ChatscreenError> {
    init_tracing(&config.server.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "chatscreen starting");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let provider = Arc::new(GeminiProvider::new(&config.gemini)?);

    if config.server.session_secret.is_none() {
        warn!("server.session_secret is unset; sessions will not survive a restart");
    }
    let session_key = SessionKey::from_secret(
        config.server.session_secret.as_deref(),
        Duration::from_secs(config.server.session_ttl_secs),
    )?;

    let auth = Arc::new(AuthService::new(storage.clone(), &config.auth)?);
    let conversation = Arc::new(ConversationService::new(
        provider.clone(),
        storage.clone(),
        Arc::new(CapturedTranscriber),
        &config.conversation,
    ));

    let state = AppState {
        auth,
        conversation,
        provider: provider.clone(),
        store: storage.clone(),
        uploads: Arc::new(config.uploads.clone()),
        session_key,
    };

    let cancel = shutdown::install_signal_handler();
    let served = chatscreen_gateway::start_server(&config.server, state, cancel).await;

    if let Err(e) = provider.shutdown().await {
        warn!(error = %e, "provider shutdown failed");
    }
    storage.close().await?;

    served?;
    info!("chatscreen serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatscreen={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chatscreen_auth::AuthService;
use chatscreen_config::model::{ServerConfig, UploadConfig};
use chatscreen_conversation::ConversationService;
use chatscreen_core::{ChatscreenError, GenerationProvider, StorageAdapter};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::session::SessionKey;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and profile operations.
    pub auth: Arc<AuthService>,
    /// Chat submission and history.
    pub conversation: Arc<ConversationService>,
    /// Used directly only for upload descriptions.
    pub provider: Arc<dyn GenerationProvider>,
    /// Storage backend, checked by `/health`.
    pub store: Arc<dyn StorageAdapter>,
    pub uploads: Arc<UploadConfig>,
    /// Signs and verifies session cookies.
    pub session_key: SessionKey,
}

/// Build the gateway router over `state`.
///
/// Every endpoint has exactly one route. Uploaded files are served from the
/// upload directory under `/uploads`.
pub fn build_router(state: AppState) -> Router {
    let uploads_dir = ServeDir::new(&state.uploads.directory);
    let body_limit = DefaultBodyLimit::max(state.uploads.max_bytes);

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/input", post(handlers::input))
        .route("/history", get(handlers::history))
        .route("/age", post(handlers::update_age))
        .route("/password", post(handlers::change_password))
        .route("/profile", get(handlers::profile))
        .route("/upload", post(handlers::upload).layer(body_limit))
        .route("/health", get(handlers::health))
        .nest_service("/uploads", uploads_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Serve the gateway until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), ChatscreenError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChatscreenError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| ChatscreenError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}

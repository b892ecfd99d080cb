// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handlers decode the request, call one service operation and encode its
//! outcome. Failures go through [`ApiError`].

use axum::{
    Json,
    extract::{Multipart, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chatscreen_auth::Session;
use chatscreen_conversation::service::placeholder_for;
use chatscreen_core::{ChatTurn, HealthStatus, Transcript, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, json_body};
use crate::server::AppState;
use crate::session::{CurrentSession, removal_cookie};
use crate::upload;

/// Request body for POST /register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for POST /input.
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    /// `text` or `mic`.
    #[serde(default)]
    pub method: Option<String>,
    /// Typed message, or the externally captured transcript for `mic`.
    #[serde(default)]
    pub text: Option<String>,
    /// Overrides the session user when present.
    #[serde(default)]
    pub username: Option<String>,
}

/// Query for GET /history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub username: Option<String>,
}

/// Request body for POST /age.
#[derive(Debug, Deserialize)]
pub struct AgeRequest {
    pub age: i64,
}

/// Request body for POST /password.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Body of every plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Response body for POST /upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(body)?;
    let message = state
        .auth
        .register(&req.username, &req.password, &req.confirm_password)
        .await?;
    Ok(MessageResponse::new(message))
}

/// POST /login
///
/// Sets the session cookie on success.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let req = json_body(body)?;
    let mut session = Session::default();
    let message = state
        .auth
        .login(&mut session, &req.username, &req.password)
        .await?;

    let jar = match session.username() {
        Some(username) => jar.add(state.session_key.login_cookie(username)),
        None => jar,
    };
    Ok((jar, MessageResponse::new(message)))
}

/// POST /logout
///
/// Always succeeds and always clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let message = state.auth.logout(&mut session);
    (jar.add(removal_cookie()), MessageResponse::new(message))
}

/// POST /input
///
/// The user is the body's `username`, then the session user, then the
/// configured default.
pub async fn input(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<InputRequest>, JsonRejection>,
) -> Result<Json<Transcript>, ApiError> {
    let req = json_body(body)?;
    let username = req.username.as_deref().or(session.username());
    let method = req.method.as_deref().unwrap_or_default();

    let transcript = state
        .conversation
        .submit(username, method, req.text.as_deref())
        .await?;
    Ok(Json(transcript))
}

/// GET /history
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Transcript>, ApiError> {
    let chat_history: Vec<ChatTurn> = state
        .conversation
        .history(query.username.as_deref())
        .await?;
    Ok(Json(Transcript {
        message: String::new(),
        chat_history,
    }))
}

/// POST /age
pub async fn update_age(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<AgeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(body)?;
    let message = state.auth.update_age(&session, req.age).await?;
    Ok(MessageResponse::new(message))
}

/// POST /password
pub async fn change_password(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<PasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(body)?;
    let message = state
        .auth
        .change_password(
            &session,
            &req.current_password,
            &req.new_password,
            &req.confirm_password,
        )
        .await?;
    Ok(MessageResponse::new(message))
}

/// GET /profile
pub async fn profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.auth.profile(&session).await?))
}

/// POST /upload
///
/// Stores the `file` field and, when enabled, asks the provider to describe
/// it. A failed description is replaced by its placeholder text.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let file = upload::read_file_field(multipart).await?;
    let filename = upload::store(&file, &state.uploads).await?;
    info!(filename = %filename, bytes = file.bytes.len(), "file uploaded");

    let description = if state.uploads.describe_images {
        let described = state
            .provider
            .describe_image(&file.bytes, upload::mime_for(&filename))
            .await;
        Some(described.unwrap_or_else(|err| {
            warn!(filename = %filename, error = %err, "image description failed");
            placeholder_for(&err)
        }))
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            image_url: format!("/uploads/{filename}"),
            filename,
            description,
        }),
    ))
}

/// GET /health
///
/// 503 when the store reports anything other than healthy.
pub async fn health(State(state): State<AppState>) -> Response {
    let status = match state.store.health_check().await {
        Ok(status) => status,
        Err(err) => HealthStatus::Unhealthy(err.to_string()),
    };
    debug!(status = ?status, "health checked");

    let (code, label) = match status {
        HealthStatus::Healthy => (StatusCode::OK, "healthy"),
        HealthStatus::Degraded(_) => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        HealthStatus::Unhealthy(_) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };
    (
        code,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
        .into_response()
}

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chatscreen_core::{AuthError, ChatscreenError, InputError};
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A domain failure from one of the services.
    Domain(ChatscreenError),
    /// A framework-level rejection that already carries its status.
    Rejection { status: StatusCode, message: String },
}

impl From<ChatscreenError> for ApiError {
    fn from(err: ChatscreenError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::Domain(err.into())
    }
}

/// Unwrap a JSON body, turning a wrong content type into 415 and anything
/// else into 400 with the parser's explanation.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            Err(InputError::UnsupportedMediaType.into())
        }
        Err(rejection) => Err(InputError::MalformedBody(rejection.body_text()).into()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Rejection { status, message } => {
                return (status, Json(json!({ "message": message }))).into_response();
            }
            ApiError::Domain(err) => err,
        };

        let (status, body) = match &err {
            ChatscreenError::Auth(auth) => auth_response(auth),
            ChatscreenError::Input(input) => input_response(input),
            ChatscreenError::AlreadyExists { .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": AuthError::UsernameTaken.to_string() }),
            ),
            ChatscreenError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
            }
            ChatscreenError::Provider { message, .. } => {
                warn!(error = %err, "provider failure reached the gateway");
                (StatusCode::BAD_GATEWAY, json!({ "error": message }))
            }
            ChatscreenError::Timeout { .. } => {
                warn!(error = %err, "timeout reached the gateway");
                (StatusCode::GATEWAY_TIMEOUT, json!({ "error": err.to_string() }))
            }
            ChatscreenError::Storage { .. }
            | ChatscreenError::Config(_)
            | ChatscreenError::Internal(_) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn auth_response(err: &AuthError) -> (StatusCode, serde_json::Value) {
    match err {
        AuthError::WeakPassword(violations) => {
            (StatusCode::BAD_REQUEST, json!({ "errors": violations }))
        }
        AuthError::InvalidCredentials => {
            (StatusCode::BAD_REQUEST, json!({ "message": err.to_string() }))
        }
        AuthError::NotAuthenticated => {
            (StatusCode::UNAUTHORIZED, json!({ "error": err.to_string() }))
        }
        AuthError::EmptyUsername
        | AuthError::PasswordMismatch
        | AuthError::UsernameTaken
        | AuthError::InvalidAge(_) => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
    }
}

fn input_response(err: &InputError) -> (StatusCode, serde_json::Value) {
    match err {
        InputError::UnsupportedMediaType => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            json!({ "error": err.to_string() }),
        ),
        InputError::MalformedBody(details) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": err.to_string(), "details": details }),
        ),
        InputError::UnsupportedInputMethod(_) | InputError::EmptyMessage => {
            (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        }
        InputError::MissingFile | InputError::EmptyFilename | InputError::DisallowedExtension(_) => {
            (StatusCode::BAD_REQUEST, json!({ "message": err.to_string() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: impl Into<ApiError>) -> (StatusCode, serde_json::Value) {
        let response = err.into().into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn weak_password_lists_errors() {
        let (status, body) =
            render(AuthError::WeakPassword(vec!["a".into(), "b".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["a", "b"] }));
    }

    #[tokio::test]
    async fn invalid_credentials_use_message_key() {
        let (status, body) = render(AuthError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid username or password.");
    }

    #[tokio::test]
    async fn not_authenticated_is_401() {
        let (status, _) = render(AuthError::NotAuthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn media_type_and_malformed_body() {
        let (status, body) = render(InputError::UnsupportedMediaType).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Unsupported media type. Expected 'application/json'");

        let (status, body) = render(InputError::MalformedBody("EOF".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid JSON data", "details": "EOF" }));
    }

    #[tokio::test]
    async fn upload_errors_use_message_key() {
        let (status, body) = render(InputError::DisallowedExtension("exe".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "File type not allowed" }));
    }

    #[tokio::test]
    async fn storage_errors_are_generic_500() {
        let err = ChatscreenError::Storage {
            source: "disk on fire".into(),
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("disk on fire"));
    }
}

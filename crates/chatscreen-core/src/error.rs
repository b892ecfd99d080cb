// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Chatscreen.
//!
//! [`ChatscreenError`] is the single error type crossing crate boundaries.
//! Caller-facing failures are grouped into [`AuthError`] and [`InputError`],
//! whose `Display` output is the exact message returned to clients.

use thiserror::Error;

/// The primary error type used across all Chatscreen services and adapters.
#[derive(Debug, Error)]
pub enum ChatscreenError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Registration, login and session failures.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed or unsupported client input.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A user with this username is already stored.
    #[error("user `{username}` already exists")]
    AlreadyExists { username: String },

    /// No user with this username is stored.
    #[error("user `{username}` not found")]
    NotFound { username: String },

    /// Generation provider errors (non-success status, unexpected payload).
    ///
    /// `message` is suitable for showing to the end user in place of a
    /// generated response.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Authentication and account errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Username cannot be empty.")]
    EmptyUsername,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Username is already taken.")]
    UsernameTaken,

    /// Every policy rule the password violated, in rule order.
    #[error("password does not meet the policy: {}", .0.join(" "))]
    WeakPassword(Vec<String>),

    /// Deliberately identical for unknown users and wrong passwords.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Not logged in.")]
    NotAuthenticated,

    #[error("Age must be between 0 and 150.")]
    InvalidAge(i64),
}

/// Client input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid input method. Please specify 'text' or 'mic'.")]
    UnsupportedInputMethod(String),

    #[error("Message text cannot be empty.")]
    EmptyMessage,

    #[error("Unsupported media type. Expected 'application/json'")]
    UnsupportedMediaType,

    /// The body could not be decoded; the payload holds parser details.
    #[error("Invalid JSON data")]
    MalformedBody(String),

    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed")]
    DisallowedExtension(String),
}

impl ChatscreenError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ChatscreenError::Storage {
            source: Box::new(err),
        }
    }
}

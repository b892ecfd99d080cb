// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Chatscreen.
//!
//! An axum router over [`AuthService`](chatscreen_auth::AuthService) and
//! [`ConversationService`](chatscreen_conversation::ConversationService).
//! Sessions live in a signed cookie, so the gateway itself holds no
//! per-client state.

pub mod error;
pub mod handlers;
pub mod server;
pub mod session;
pub mod upload;

pub use error::ApiError;
pub use server::{AppState, build_router, start_server};
pub use session::{SESSION_COOKIE, SessionKey};

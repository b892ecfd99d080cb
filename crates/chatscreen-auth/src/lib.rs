// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accounts for Chatscreen.
//!
//! Password policy grading, argon2id hashing, the per-client [`Session`]
//! state machine and the [`AuthService`] that ties them to a
//! [`chatscreen_core::CredentialStore`].

pub mod hash;
pub mod policy;
pub mod service;
pub mod session;

pub use hash::Argon2Hasher;
pub use service::AuthService;
pub use session::Session;

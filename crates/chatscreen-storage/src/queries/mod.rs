// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries over the storage tables.

pub mod chat_history;
pub mod users;

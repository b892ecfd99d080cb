// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for storage entities.
//!
//! The canonical types live in `chatscreen-core::types` so they can cross
//! trait boundaries; they are re-exported here for the query modules.

pub use chatscreen_core::types::{ChatEntry, ChatTurn, EntryId, User};

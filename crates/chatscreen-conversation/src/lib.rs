// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt submission for Chatscreen.
//!
//! [`ConversationService`] takes one utterance, forwards it to the
//! generation provider, records the exchange and hands back the user's full
//! transcript.

pub mod service;
pub mod transcriber;

pub use service::ConversationService;
pub use transcriber::{CapturedTranscriber, UNRECOGNIZED_AUDIO};

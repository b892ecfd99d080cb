// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcriber trait for microphone input.

use async_trait::async_trait;

/// Turns captured microphone input into text.
///
/// Transcription never fails: an unrecognized or unavailable capture yields
/// a placeholder sentence, which callers treat as ordinary text.
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    async fn transcribe(&self, captured: Option<&str>) -> String;
}

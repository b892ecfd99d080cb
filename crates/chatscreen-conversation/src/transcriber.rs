// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcriber for clients that capture speech themselves.

use async_trait::async_trait;
use chatscreen_core::Transcriber;

/// Returned when a mic submission carries no recognizable speech.
pub const UNRECOGNIZED_AUDIO: &str = "Sorry, I could not understand the audio.";

/// Passes client-side transcriptions through unchanged.
///
/// Browsers run speech recognition locally and send the text, so the server
/// only has to fill in a placeholder when nothing usable arrived.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapturedTranscriber;

#[async_trait]
impl Transcriber for CapturedTranscriber {
    async fn transcribe(&self, captured: Option<&str>) -> String {
        match captured {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => UNRECOGNIZED_AUDIO.to_string(),
        }
    }
}

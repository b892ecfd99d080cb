// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcriber that ignores its input.

use async_trait::async_trait;
use chatscreen_core::Transcriber;

/// Always "hears" the same sentence.
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    text: String,
}

impl MockTranscriber {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _captured: Option<&str>) -> String {
        self.text.clone()
    }
}

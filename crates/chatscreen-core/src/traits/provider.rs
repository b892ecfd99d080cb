// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation provider trait for the external generative-text service.

use async_trait::async_trait;

use crate::error::ChatscreenError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for a generative-text service.
///
/// Failures are reported as [`ChatscreenError::Provider`] or
/// [`ChatscreenError::Timeout`]; callers decide whether to substitute a
/// placeholder.
#[async_trait]
pub trait GenerationProvider: PluginAdapter {
    /// Sends a single prompt and returns the completion text.
    async fn generate(&self, prompt: &str) -> Result<String, ChatscreenError>;

    /// Asks the service to describe an image.
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, ChatscreenError>;
}

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generation provider for Chatscreen.
//!
//! Implements [`GenerationProvider`] over the `generateContent` REST
//! endpoint for text prompts and inline image description.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use chatscreen_config::model::GeminiConfig;
use chatscreen_core::{AdapterType, ChatscreenError, GenerationProvider, HealthStatus, PluginAdapter};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Prompt sent alongside an image to be described.
pub const DESCRIBE_IMAGE_PROMPT: &str = "Describe this image in detail.";

/// Gemini provider implementing [`GenerationProvider`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
#[derive(Debug)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self, ChatscreenError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GeminiClient::new(
            api_key,
            config.model.clone(),
            config.api_base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = %config.model, "Gemini provider initialized");
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatscreenError> {
        // Probing the API would spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatscreenError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ChatscreenError> {
        self.client
            .generate_content(&GenerateContentRequest::text(prompt))
            .await
    }

    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, ChatscreenError> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        self.client
            .generate_content(&GenerateContentRequest::image(
                DESCRIBE_IMAGE_PROMPT,
                mime_type,
                data,
            ))
            .await
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, ChatscreenError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ChatscreenError::Config(
                "Gemini API key not found. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
            )
        })
}

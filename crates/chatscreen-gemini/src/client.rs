// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.

use std::fmt;
use std::time::Duration;

use chatscreen_core::ChatscreenError;
use reqwest::Url;
use tracing::debug;

use crate::types::{ExtractError, GenerateContentRequest, GenerateContentResponse};

pub const NO_CONTENT_MESSAGE: &str = "Error: No response content from the Gemini API.";
pub const UNEXPECTED_STRUCTURE_MESSAGE: &str =
    "Error: Unexpected response structure from the Gemini API.";

/// HTTP client for one Gemini model.
///
/// Every error it returns is a [`ChatscreenError::Provider`] whose message
/// can be shown to the user as-is, or a [`ChatscreenError::Timeout`].
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ChatscreenError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatscreenError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Result<Url, ChatscreenError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&url, &[("key", self.api_key.as_str())])
            .map_err(|e| ChatscreenError::Config(format!("invalid Gemini endpoint `{url}`: {e}")))
    }

    /// Send `request` and return the first candidate's text, trimmed.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, ChatscreenError> {
        let response = self
            .client
            .post(self.endpoint()?)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ChatscreenError::Provider {
                message: format!("API Error: {}, {body}", status.as_u16()),
                source: None,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ChatscreenError::Provider {
                message: UNEXPECTED_STRUCTURE_MESSAGE.to_string(),
                source: Some(Box::new(e)),
            })?;

        parsed.first_text().map_err(|e| ChatscreenError::Provider {
            message: match e {
                ExtractError::NoContent => NO_CONTENT_MESSAGE,
                ExtractError::UnexpectedStructure => UNEXPECTED_STRUCTURE_MESSAGE,
            }
            .to_string(),
            source: None,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ChatscreenError {
        if e.is_timeout() {
            return ChatscreenError::Timeout {
                duration: self.timeout,
            };
        }
        // reqwest includes the URL, which carries the key.
        let e = e.without_url();
        ChatscreenError::Provider {
            message: format!("API Error: request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

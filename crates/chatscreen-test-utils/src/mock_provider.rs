// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation provider for deterministic testing.
//!
//! `MockGenerator` implements `GenerationProvider` with pre-configured
//! replies, so tests never reach the Gemini API.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use chatscreen_core::{AdapterType, ChatscreenError, GenerationProvider, HealthStatus, PluginAdapter};

/// Text returned when the reply queue is empty.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted outcome of a provider call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Succeed with this text.
    Text(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Sleep this long before answering with [`DEFAULT_REPLY`].
    Delay(Duration),
}

/// A mock generation provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue shared by `generate` and
/// `describe_image`. When the queue is empty, [`DEFAULT_REPLY`] is
/// returned. Every prompt received is recorded.
#[derive(Default)]
pub struct MockGenerator {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    /// Create a new mock generator with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock generator pre-loaded with successful replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            prompts: Arc::default(),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Prompts received so far, oldest first. Image requests are recorded as
    /// `image:<mime>:<len>`.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    async fn answer(&self, prompt: String) -> Result<String, ChatscreenError> {
        self.prompts.lock().await.push(prompt);
        let reply = self.replies.lock().await.pop_front();
        match reply {
            None => Ok(DEFAULT_REPLY.to_string()),
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(ChatscreenError::Provider {
                message,
                source: None,
            }),
            Some(MockReply::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(DEFAULT_REPLY.to_string())
            }
        }
    }
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatscreenError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatscreenError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ChatscreenError> {
        self.answer(prompt.to_string()).await
    }

    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, ChatscreenError> {
        self.answer(format!("image:{mime_type}:{}", image.len())).await
    }
}

// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete gateway stack with a mock
//! generator, a temp SQLite database and a temp upload directory. The
//! router it returns can be driven with `tower::ServiceExt::oneshot`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chatscreen_auth::AuthService;
use chatscreen_config::model::{
    AuthConfig, ChatscreenConfig, ConversationConfig, StorageConfig, UploadConfig,
};
use chatscreen_conversation::{CapturedTranscriber, ConversationService};
use chatscreen_core::{ChatscreenError, StorageAdapter, Transcriber};
use chatscreen_gateway::{AppState, SessionKey, build_router};
use chatscreen_storage::SqliteStorage;

use crate::mock_provider::{MockGenerator, MockReply};
use crate::mock_transcriber::MockTranscriber;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    transcript: Option<String>,
    generation_timeout_secs: u64,
    describe_images: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            transcript: None,
            generation_timeout_secs: ConversationConfig::default().generation_timeout_secs,
            describe_images: false,
        }
    }

    /// Set successful mock generator responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.replies = responses.into_iter().map(MockReply::Text).collect();
        self
    }

    /// Set scripted mock generator replies, including failures.
    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    /// Replace the pass-through transcriber with one that always returns
    /// `text`.
    pub fn with_transcript(mut self, text: impl Into<String>) -> Self {
        self.transcript = Some(text.into());
        self
    }

    pub fn with_generation_timeout(mut self, secs: u64) -> Self {
        self.generation_timeout_secs = secs;
        self
    }

    /// Ask the generator to describe uploaded images.
    pub fn describe_images(mut self, enabled: bool) -> Self {
        self.describe_images = enabled;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, ChatscreenError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| ChatscreenError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");
        let upload_dir = temp_dir.path().join("uploads");

        let config = ChatscreenConfig {
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().into_owned(),
                wal_mode: true,
            },
            uploads: UploadConfig {
                directory: upload_dir.to_string_lossy().into_owned(),
                describe_images: self.describe_images,
                ..UploadConfig::default()
            },
            // Minimum-cost hashing keeps tests fast.
            auth: AuthConfig {
                hash_memory_cost: 1024,
                hash_iterations: 1,
                hash_parallelism: 1,
            },
            conversation: ConversationConfig {
                generation_timeout_secs: self.generation_timeout_secs,
                ..ConversationConfig::default()
            },
            ..ChatscreenConfig::default()
        };

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        let provider = Arc::new(MockGenerator::with_replies(self.replies));
        let transcriber: Arc<dyn Transcriber> = match self.transcript {
            Some(text) => Arc::new(MockTranscriber::new(text)),
            None => Arc::new(CapturedTranscriber),
        };

        let auth = Arc::new(AuthService::new(storage.clone(), &config.auth)?);
        let conversation = Arc::new(ConversationService::new(
            provider.clone(),
            storage.clone(),
            transcriber,
            &config.conversation,
        ));

        let state = AppState {
            auth,
            conversation,
            provider: provider.clone(),
            store: storage.clone(),
            uploads: Arc::new(config.uploads.clone()),
            session_key: SessionKey::generate(Duration::from_secs(
                config.server.session_ttl_secs,
            ))?,
        };

        Ok(TestHarness {
            provider,
            storage,
            state,
            config,
            upload_dir,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock generator and temp storage.
pub struct TestHarness {
    /// The mock generation provider.
    pub provider: Arc<MockGenerator>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// Gateway state wired to the above.
    pub state: AppState,
    /// Effective configuration.
    pub config: ChatscreenConfig,
    /// Where uploads are written.
    pub upload_dir: PathBuf,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A fresh router over the harness state.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Add a reply to the mock generator's queue.
    pub async fn add_provider_reply(&self, reply: MockReply) {
        self.provider.push(reply).await;
    }
}

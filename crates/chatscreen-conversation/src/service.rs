// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt/response exchange and transcript retrieval.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chatscreen_config::model::ConversationConfig;
use chatscreen_core::{
    ChatHistoryStore, ChatTurn, ChatscreenError, GenerationProvider, InputError, InputMethod,
    Transcriber, Transcript,
};
use tracing::{debug, warn};

/// Runs one exchange per submission against a provider and a history store.
pub struct ConversationService {
    provider: Arc<dyn GenerationProvider>,
    history: Arc<dyn ChatHistoryStore>,
    transcriber: Arc<dyn Transcriber>,
    default_username: String,
    generation_timeout: Duration,
}

impl ConversationService {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        history: Arc<dyn ChatHistoryStore>,
        transcriber: Arc<dyn Transcriber>,
        config: &ConversationConfig,
    ) -> Self {
        Self {
            provider,
            history,
            transcriber,
            default_username: config.default_username.clone(),
            generation_timeout: Duration::from_secs(config.generation_timeout_secs),
        }
    }

    /// Submit one utterance and return the updated transcript.
    ///
    /// Generation failures never fail the call: the placeholder that stands in
    /// for the response is stored and returned like a real one. Only input
    /// validation and storage faults are errors.
    pub async fn submit(
        &self,
        username: Option<&str>,
        method: &str,
        utterance: Option<&str>,
    ) -> Result<Transcript, ChatscreenError> {
        let method = InputMethod::from_str(method)
            .map_err(|_| InputError::UnsupportedInputMethod(method.to_string()))?;

        let prompt = match method {
            InputMethod::Text => match utterance {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => return Err(InputError::EmptyMessage.into()),
            },
            InputMethod::Mic => self.transcriber.transcribe(utterance).await,
        };

        let username = self.resolve_username(username);
        let response = self.generate(&prompt).await;

        let id = self.history.append(username, &prompt, &response).await?;
        debug!(username = %username, entry = id.0, method = %method, "exchange recorded");

        let chat_history = self.history.history_for(username).await?;
        Ok(Transcript {
            message: response,
            chat_history,
        })
    }

    /// The stored transcript for `username`, without submitting anything.
    pub async fn history(&self, username: Option<&str>) -> Result<Vec<ChatTurn>, ChatscreenError> {
        self.history
            .history_for(self.resolve_username(username))
            .await
    }

    fn resolve_username<'a>(&'a self, username: Option<&'a str>) -> &'a str {
        match username {
            Some(name) if !name.is_empty() => name,
            _ => &self.default_username,
        }
    }

    async fn generate(&self, prompt: &str) -> String {
        let outcome = tokio::time::timeout(self.generation_timeout, self.provider.generate(prompt))
            .await
            .unwrap_or_else(|_| {
                Err(ChatscreenError::Timeout {
                    duration: self.generation_timeout,
                })
            });

        match outcome {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    provider = self.provider.name(),
                    error = %err,
                    "generation failed, using placeholder"
                );
                placeholder_for(&err)
            }
        }
    }
}

/// The user-visible text that replaces a failed generation.
pub fn placeholder_for(err: &ChatscreenError) -> String {
    match err {
        ChatscreenError::Provider { message, .. } => message.clone(),
        ChatscreenError::Timeout { duration } => {
            format!("API Error: request timed out after {}s", duration.as_secs())
        }
        other => format!("Error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatscreen_core::{AdapterType, EntryId, HealthStatus, PluginAdapter};
    use tokio::sync::Mutex;

    use crate::transcriber::{CapturedTranscriber, UNRECOGNIZED_AUDIO};

    enum Reply {
        Text(&'static str),
        Fail(&'static str),
        Hang,
    }

    struct ScriptedProvider {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PluginAdapter for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
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
    impl GenerationProvider for ScriptedProvider {
        async fn generate(&self, prompt: &str) -> Result<String, ChatscreenError> {
            self.prompts.lock().await.push(prompt.to_string());
            match self.reply {
                Reply::Text(t) => Ok(t.to_string()),
                Reply::Fail(m) => Err(ChatscreenError::Provider {
                    message: m.to_string(),
                    source: None,
                }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("too late".to_string())
                }
            }
        }

        async fn describe_image(&self, _: &[u8], _: &str) -> Result<String, ChatscreenError> {
            Ok("an image".to_string())
        }
    }

    #[derive(Default)]
    struct MemoryHistory {
        rows: Mutex<Vec<(String, ChatTurn)>>,
    }

    #[async_trait]
    impl ChatHistoryStore for MemoryHistory {
        async fn append(
            &self,
            username: &str,
            user_message: &str,
            ai_response: &str,
        ) -> Result<EntryId, ChatscreenError> {
            let mut rows = self.rows.lock().await;
            rows.push((
                username.to_string(),
                ChatTurn {
                    user: user_message.to_string(),
                    ai: ai_response.to_string(),
                },
            ));
            Ok(EntryId(rows.len() as i64))
        }

        async fn history_for(&self, username: &str) -> Result<Vec<ChatTurn>, ChatscreenError> {
            Ok(self
                .rows
                .lock()
                .await
                .iter()
                .filter(|(u, _)| u == username)
                .map(|(_, t)| t.clone())
                .collect())
        }
    }

    fn service(reply: Reply) -> (ConversationService, Arc<ScriptedProvider>, Arc<MemoryHistory>) {
        let provider = Arc::new(ScriptedProvider {
            reply,
            prompts: Mutex::new(Vec::new()),
        });
        let history = Arc::new(MemoryHistory::default());
        let config = ConversationConfig {
            default_username: "Anonymous".to_string(),
            generation_timeout_secs: 1,
        };
        let svc = ConversationService::new(
            provider.clone(),
            history.clone(),
            Arc::new(CapturedTranscriber),
            &config,
        );
        (svc, provider, history)
    }

    #[tokio::test]
    async fn text_submission_records_and_returns_transcript() {
        let (svc, _, _) = service(Reply::Text("Hi there"));

        svc.submit(Some("alice"), "text", Some("first")).await.unwrap();
        let transcript = svc.submit(Some("alice"), "text", Some("Hello")).await.unwrap();

        assert_eq!(transcript.message, "Hi there");
        assert_eq!(transcript.chat_history.len(), 2);
        assert_eq!(transcript.chat_history[1].user, "Hello");
        assert_eq!(transcript.chat_history[1].ai, "Hi there");
    }

    #[tokio::test]
    async fn missing_username_uses_default() {
        let (svc, _, history) = service(Reply::Text("ok"));

        svc.submit(None, "text", Some("a")).await.unwrap();
        svc.submit(Some(""), "text", Some("b")).await.unwrap();

        assert_eq!(history.history_for("Anonymous").await.unwrap().len(), 2);
        assert_eq!(svc.history(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_method_persists_nothing() {
        let (svc, provider, history) = service(Reply::Text("ok"));

        let err = svc.submit(Some("alice"), "fax", Some("hi")).await.unwrap_err();
        assert!(matches!(
            err,
            ChatscreenError::Input(InputError::UnsupportedInputMethod(ref m)) if m == "fax"
        ));
        assert_eq!(
            err.to_string(),
            "Invalid input method. Please specify 'text' or 'mic'."
        );
        assert!(provider.prompts.lock().await.is_empty());
        assert!(history.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let (svc, _, history) = service(Reply::Text("ok"));

        for utterance in [None, Some("")] {
            let err = svc.submit(Some("alice"), "text", utterance).await.unwrap_err();
            assert!(matches!(err, ChatscreenError::Input(InputError::EmptyMessage)));
        }
        assert!(history.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn mic_without_capture_forwards_placeholder() {
        let (svc, provider, _) = service(Reply::Text("Could you repeat that?"));

        let transcript = svc.submit(Some("bob"), "mic", None).await.unwrap();
        assert_eq!(provider.prompts.lock().await.as_slice(), [UNRECOGNIZED_AUDIO]);
        assert_eq!(transcript.chat_history[0].user, UNRECOGNIZED_AUDIO);
    }

    #[tokio::test]
    async fn provider_failure_is_persisted_as_placeholder() {
        let (svc, _, _) = service(Reply::Fail("API Error: 500, boom"));

        let transcript = svc.submit(Some("alice"), "text", Some("Hello")).await.unwrap();
        assert_eq!(transcript.message, "API Error: 500, boom");
        assert_eq!(transcript.chat_history[0].ai, "API Error: 500, boom");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out_into_placeholder() {
        let (svc, _, _) = service(Reply::Hang);

        let transcript = svc.submit(Some("alice"), "text", Some("Hello")).await.unwrap();
        assert_eq!(transcript.message, "API Error: request timed out after 1s");
        assert_eq!(transcript.chat_history.len(), 1);
    }

    #[test]
    fn placeholder_for_other_errors() {
        let err = ChatscreenError::Internal("boom".to_string());
        assert_eq!(placeholder_for(&err), "Error: internal error: boom");
    }
}

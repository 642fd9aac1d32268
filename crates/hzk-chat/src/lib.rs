//! # hzk-chat — Typed client for the hosted Gemini chat API
//!
//! Relays free-text questions to a hosted model and returns the reply.
//! The REST endpoint is stateless, so conversation history is kept in a
//! [`ChatSession`] owned by the caller and replayed on every call.
//!
//! ## API Path Convention
//!
//! `{base_url}/v1beta/models/{model}:generateContent`, authenticated with
//! the `x-goog-api-key` header.
//!
//! There is no retry layer: a failed call is reported once and the session
//! history is left as it was before the call.

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::ChatConfig;
pub use error::ChatError;
pub use session::ChatSession;

use std::sync::Arc;
use std::time::Duration;

use types::{Content, GenerateContentRequest, GenerateContentResponse};

/// API version path segment.
const API_PREFIX: &str = "v1beta/models";

/// Shared, cloneable chat client. Holds the HTTP connection pool and the
/// model settings; conversation state lives in [`ChatSession`].
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: Arc<ChatConfig>,
}

impl ChatClient {
    /// Create a new client from configuration.
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Start a conversation with empty history.
    pub fn start_chat(&self) -> ChatSession {
        ChatSession::new(self.clone())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{API_PREFIX}/{}:generateContent",
            self.config.base_url.as_str().trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send `contents` (history plus the new user turn) and return the
    /// model's reply turn.
    pub(crate) async fn generate(&self, contents: &[Content]) -> Result<Content, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChatError::MissingApiKey)?;
        let endpoint = self.endpoint();

        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![types::Part {
                    text: self.config.system_instruction.clone(),
                }],
            },
            contents,
            generation_config: &self.config.generation,
            safety_settings: &self.config.safety,
        };

        tracing::debug!(model = %self.config.model, turns = contents.len(), "sending generateContent");
        let resp = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse =
            resp.json().await.map_err(|e| ChatError::Deserialization {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(ChatError::Blocked { reason });
        }

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| ChatError::Blocked {
            reason: "no candidates returned".to_string(),
        })?;
        match candidate.content {
            Some(content) if !content.parts.is_empty() => Ok(Content::model(content.text())),
            _ => Err(ChatError::Blocked {
                reason: candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty candidate".to_string()),
            }),
        }
    }
}

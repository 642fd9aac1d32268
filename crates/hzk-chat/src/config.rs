//! Chat client configuration.
//!
//! Defaults target the production Gemini endpoint with the health-assistant
//! persona. Override via environment variables or explicit construction for
//! testing.

use url::Url;

use crate::types::{GenerationConfig, SafetySetting};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Default persona given to the model on every call.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are SOD, a health therapist and medical assistant, answering only health-related questions.";

/// Configuration for the chat client.
///
/// Custom `Debug` implementation redacts the `api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ChatConfig {
    /// API base URL.
    pub base_url: Url,
    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// API key. Absence is tolerated until the first message is sent.
    pub api_key: Option<String>,
    /// Persona instruction sent with every request.
    pub system_instruction: String,
    pub generation: GenerationConfig,
    pub safety: Vec<SafetySetting>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("system_instruction", &self.system_instruction)
            .field("generation", &self.generation)
            .field("safety", &self.safety)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ChatConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `API_KEY` (optional here; a missing key fails the first message)
    /// - `GEMINI_BASE_URL` (default: `https://generativelanguage.googleapis.com`)
    /// - `GEMINI_MODEL` (default: `gemini-1.5-flash`)
    /// - `GEMINI_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("GEMINI_BASE_URL", DEFAULT_BASE_URL)?;
        let mut config = Self::new(base_url, std::env::var("API_KEY").ok());
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Some(secs) = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Ok(config)
    }

    /// Defaults against an explicit base URL.
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            base_url,
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            generation: GenerationConfig::default(),
            safety: SafetySetting::defaults(),
            timeout_secs: 60,
        }
    }

    /// Create a configuration pointing to a local mock server (for testing).
    pub fn local_mock(base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))?;
        let mut config = Self::new(url, Some(api_key.to_string()));
        config.timeout_secs = 5;
        Ok(config)
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

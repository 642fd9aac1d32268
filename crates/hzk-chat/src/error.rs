//! Chat client error types.

/// Errors from a chat relay call.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// No API key was configured.
    #[error("API key is not configured; set API_KEY")]
    MissingApiKey,
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The API returned a non-2xx status.
    #[error("chat API {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The prompt or reply was withheld, typically by content-safety filters.
    #[error("response blocked: {reason}")]
    Blocked { reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every proof-path failure is a client error (400) carrying the prover's
//! message; every relay failure is a 500 carrying the upstream message.
//! Anything unexpected, such as a panicked proof task, is a 500 whose
//! details stay in the logs.
//! Bodies are always `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hzk_chat::ChatError;
use hzk_prover::ProverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Proof generation failed at any stage (400).
    #[error(transparent)]
    Proof(#[from] ProverError),

    /// Request body could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// Chat relay failed (500). The upstream message is returned.
    #[error("{0}")]
    Relay(String),

    /// Unknown chat session (404).
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Proof(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Relay(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("background task failed: {err}"))
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        Self::Relay(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Proof(e) if !e.is_precondition() => {
                tracing::error!(error = %self, "proof generation failed")
            }
            Self::Proof(_) | Self::BadRequest(_) => {
                tracing::info!(error = %self, "rejected request")
            }
            Self::Relay(_) => tracing::error!(error = %self, "chat relay error"),
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::SessionNotFound(_) => {}
        }

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn invalid_circuit_is_400_with_message() {
        let (status, body) =
            response_parts(ProverError::InvalidCircuit("X".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid circuit selection.");
    }

    #[tokio::test]
    async fn subprocess_failure_is_400() {
        let err = ProverError::Subprocess {
            tool: "snarkjs",
            code: Some(1),
            stderr: "boom".into(),
        };
        let (status, body) = response_parts(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Error during subprocess execution: boom");
    }

    #[tokio::test]
    async fn missing_file_is_400_naming_path() {
        let err = ProverError::MissingFile(PathBuf::from("backend/circom/input.json"));
        let (status, body) = response_parts(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "File not found: backend/circom/input.json");
    }

    #[tokio::test]
    async fn relay_error_is_500_with_message() {
        let (status, body) = response_parts(ChatError::MissingApiKey.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.error.contains("API_KEY"));
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("lock poisoned".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "An internal error occurred");
    }

    #[tokio::test]
    async fn panicked_task_is_500_without_details() {
        let join_err = tokio::spawn(async { panic!("witness buffer overflow") })
            .await
            .unwrap_err();
        let err = AppError::from(join_err);
        assert!(matches!(&err, AppError::Internal(msg) if msg.contains("panic")));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "An internal error occurred");
    }

    #[tokio::test]
    async fn session_not_found_is_404() {
        let (status, body) = response_parts(AppError::SessionNotFound("abc".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("abc"));
    }
}

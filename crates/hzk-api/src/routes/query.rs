//! # Health Assistant Relay
//!
//! Routes:
//! - POST   /query — relay a question to the hosted model
//! - DELETE /sessions/:id — end a conversation
//!
//! `/query` takes a form body. Without `session_id` a new conversation is
//! opened and its id returned; passing the id back continues it. The
//! `proof` and `public_signals` fields are accepted for client
//! compatibility and are not verified or forwarded.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::extract_form;
use crate::state::AppState;

/// Form fields of a relay request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// The question to relay. Required.
    #[serde(default)]
    pub question: Option<String>,
    /// Accepted but not verified.
    #[serde(default)]
    pub proof: Option<String>,
    /// Accepted but not verified.
    #[serde(default)]
    pub public_signals: Option<String>,
    /// Conversation to continue; a new one is opened when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Relay reply.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub response: String,
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct SessionPath {
    /// Session id returned by `/query`.
    pub id: String,
}

/// Build the relay router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/query", post(query))
        .route("/sessions/:id", delete(end_session))
}

/// POST /query — Relay a question to the health assistant.
#[utoipa::path(
    post,
    path = "/query",
    request_body(content = QueryRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Model reply", body = QueryResponse),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
        (status = 500, description = "Relay failure", body = crate::error::ErrorBody),
    ),
    tag = "query"
)]
pub(crate) async fn query(
    State(state): State<AppState>,
    body: Result<Form<QueryRequest>, FormRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let req = extract_form(body)?;
    let question = req
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Relay("question is required".to_string()))?;
    if req.proof.is_some() || req.public_signals.is_some() {
        tracing::debug!("proof fields supplied; not verified");
    }

    let (session_id, session, opened) = match req.session_id.as_deref() {
        Some(raw) => {
            let id = parse_session_id(raw)?;
            let handle = state
                .sessions
                .get(&id)
                .ok_or_else(|| AppError::SessionNotFound(raw.to_string()))?;
            (id, handle, false)
        }
        None => {
            let (id, handle) = state.sessions.create(&state.chat);
            (id, handle, true)
        }
    };

    let result = session.lock().await.send_message(&question).await;
    let response = match result {
        Ok(text) => text,
        Err(e) => {
            // The id was never returned, so nothing can reach this session.
            if opened {
                state.sessions.remove(&session_id);
            }
            return Err(e.into());
        }
    };
    tracing::info!(%session_id, "relayed question");
    Ok(Json(QueryResponse {
        response,
        session_id,
    }))
}

/// DELETE /sessions/:id — End a conversation and drop its history.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(SessionPath),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
    ),
    tag = "query"
)]
pub(crate) async fn end_session(
    State(state): State<AppState>,
    Path(SessionPath { id }): Path<SessionPath>,
) -> Result<StatusCode, AppError> {
    let parsed = parse_session_id(&id)?;
    if state.sessions.remove(&parsed) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::SessionNotFound(raw.to_string()))
}

//! # Body Extraction Helpers
//!
//! Maps axum's JSON and form rejections onto [`AppError`] so that every
//! failure, including a malformed body, uses the `{"error": …}` shape and
//! the status code of its route.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::{Form, Json};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a form body, mapping rejections to [`AppError::Relay`].
pub fn extract_form<T>(result: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    result
        .map(|Form(v)| v)
        .map_err(|err| AppError::Relay(err.body_text()))
}

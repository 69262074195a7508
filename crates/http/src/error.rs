//! Error handling for the biblio HTTP layer

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::forms::FieldError;

/// Application error types that map to HTTP responses
///
/// Validation failures are normally handled inside a workflow by re-rendering
/// the originating form; the `Validation` variant exists for the rare caller
/// that wants to surface one directly. Store failures arrive through the
/// `From<StoreError>` impl and are never retried.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        errors: Vec<FieldError>,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(errors: Vec<FieldError>, message: impl Into<String>) -> Self {
        Self::Validation {
            errors,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl From<biblio_store::StoreError> for AppError {
    fn from(err: biblio_store::StoreError) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();

        let (status, error_code, message) = match &self {
            AppError::Validation { message, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message.clone(),
            ),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message.clone()),
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.to_string(),
            ),
        };

        tracing::error!(
            error_id = %error_id,
            error_code = %error_code,
            status_code = %status.as_u16(),
            "Request error"
        );

        // In production, we might want to hide internal error details
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = format!(
            "<!DOCTYPE html>\n<html><head><title>{status}</title></head><body>\
             <h1>{status}</h1><p>{message}</p>\
             <p><small>error id {error_id} at {timestamp}</small></p>\
             </body></html>",
            status = status,
            message = crate::forms::escape(&message),
            error_id = error_id,
            timestamp = timestamp,
        );

        (status, Html(body)).into_response()
    }
}

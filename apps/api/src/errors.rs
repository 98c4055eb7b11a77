use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::session::accounting::Rejection;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Please enter a question to get guidance.")]
    EmptyInput,

    #[error("Please provide an OpenRouter API key.")]
    MissingCredential,

    #[error("Session {0} already has a request in flight")]
    SessionBusy(uuid::Uuid),

    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::EmptyInput => AppError::EmptyInput,
            Rejection::MissingCredential => AppError::MissingCredential,
            Rejection::UnsupportedModel(_) => AppError::Validation(rejection.to_string()),
            Rejection::UnknownChecklistItem { .. } => AppError::NotFound(rejection.to_string()),
        }
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::EmptyInput => "EMPTY_INPUT",
            AppError::MissingCredential => "MISSING_CREDENTIAL",
            AppError::SessionBusy(_) => "SESSION_BUSY",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::EmptyInput => StatusCode::BAD_REQUEST,
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::SessionBusy(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user. Upstream diagnostics are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                msg.clone()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err: AppError = LlmError::Api {
            status: 401,
            message: "{\"error\":\"No auth credentials found\"}".to_string(),
        }
        .into();
        let msg = err.user_message();
        assert!(msg.contains("401"));
        assert!(msg.contains("No auth credentials found"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::EmptyInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::SessionBusy(uuid::Uuid::nil()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Upstream("boom".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}

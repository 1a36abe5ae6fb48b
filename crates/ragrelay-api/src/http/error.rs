//! Application error type mapping to HTTP status codes.
//!
//! Responses carry a minimal `{"code", "message"}` body. Login
//! failures surface only the generic incorrect-credentials wording;
//! the specific cause stays server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ragrelay_types::error::{AuthError, ChatError, ProviderError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication/registration errors.
    Auth(AuthError),
    /// Chat orchestration errors.
    Chat(ChatError),
    /// Validation error from the HTTP layer itself.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Incorrect username or password".to_string(),
            ),
            AppError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token".to_string(),
            ),
            AppError::Auth(AuthError::UsernameTaken(name)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Username '{name}' is already taken"),
            ),
            AppError::Auth(AuthError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                e.to_string(),
            ),
            AppError::Chat(ChatError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message text must not be empty".to_string(),
            ),
            AppError::Chat(ChatError::ConversationNotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Conversation not found".to_string(),
            ),
            AppError::Chat(ChatError::Provider(ProviderError::Unavailable(msg))) => (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Chat(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CHAT_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = json!({
            "code": code,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced directly on the HTTP surface, outside of JSON-RPC.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: &'static str },
    #[error("session not found")]
    SessionNotFound,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn unauthorized(message: &'static str) -> Self {
        Self::Unauthorized { message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            Self::SessionNotFound => (StatusCode::NOT_FOUND, "Session not found"),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

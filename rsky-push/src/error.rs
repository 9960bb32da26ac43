//! Error types for the push service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any failure talking to the notification provider. Carries the provider's text verbatim.
    #[error("{0}")]
    Registration(String),

    /// Request body rejected before reaching the provider
    #[error("{detail}")]
    Validation { status: StatusCode, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Error::Registration(msg) => {
                tracing::error!("Registration failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            Error::Validation { status, detail } => (status, detail),
            Error::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

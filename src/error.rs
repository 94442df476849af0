use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("{0}")]
    Validation(String),

    #[error("No entry found for site: {0}")]
    NotFound(String),

    #[error("Stored password could not be decrypted with the current key")]
    Decryption,

    #[error("Database error: {0}")]
    Storage(#[from] SqlxError),

    #[error("Key file error: {0}")]
    KeyIo(std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Actor error: {0}")]
    Actor(String),
}

impl VaultError {
    pub fn blank_field() -> Self {
        VaultError::Validation("You have left a field blank.".to_string())
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match &self {
            VaultError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                },
            ),
            VaultError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "No entry found.".to_string(),
                },
            ),
            VaultError::Decryption => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorBody {
                    code: "DECRYPTION_ERROR".to_string(),
                    message: "Stored password is unreadable with the current key.".to_string(),
                },
            ),
            VaultError::Storage(_)
            | VaultError::KeyIo(_)
            | VaultError::Config(_)
            | VaultError::Io(_)
            | VaultError::Actor(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

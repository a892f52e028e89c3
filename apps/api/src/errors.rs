use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::provider::AuthServiceError;
use crate::image_client::ImageApiError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The JSON body is what the client shows as a transient notification.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Session is still resolving")]
    SessionResolving,

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Image API error: {0}")]
    ImageApi(#[from] ImageApiError),

    /// The image was generated but recording it failed.
    #[error("Recording generation failed: {source}")]
    RecordFailed {
        image_url: String,
        source: sqlx::Error,
    },
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Rejected { message, .. } => AppError::Auth(message),
            other => {
                tracing::error!("Auth service error: {other}");
                AppError::Auth("Authentication failed".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::SessionResolving => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_RESOLVING",
                "Loading...".to_string(),
            ),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::ImageApi(e) => {
                tracing::error!("Image API error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "IMAGE_API_ERROR",
                    "Failed to generate image".to_string(),
                )
            }
            AppError::RecordFailed { source, .. } => {
                tracing::error!("Failed to record generation: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RECORD_ERROR",
                    "Image generated but could not be saved".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        if let AppError::RecordFailed { image_url, .. } = &self {
            body["error"]["image_url"] = json!(image_url);
        }

        (status, Json(body)).into_response()
    }
}

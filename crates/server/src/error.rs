//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use doodle_engine::error::SceneError;
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Scene(#[from] SceneError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Scene service is not running")]
    SceneUnavailable,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Scene(e) => match e {
                SceneError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                SceneError::DuplicateId(_) => (StatusCode::CONFLICT, "DUPLICATE_ID"),
                SceneError::DanglingReference { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "DANGLING_REFERENCE")
                }
                SceneError::InvalidScale { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SCALE"),
                SceneError::NonFiniteTransform { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TRANSFORM")
                }
                SceneError::NonFiniteGeometry { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_GEOMETRY")
                }
                SceneError::InvalidMaterial { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_MATERIAL")
                }
                SceneError::InvalidSettings(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SETTINGS")
                }
                SceneError::Serialization(_) => (StatusCode::BAD_REQUEST, "INVALID_SCENE"),
                SceneError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::SceneUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "SCENE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

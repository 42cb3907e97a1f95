use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use engine::EngineError;
use storage::error::StorageError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Engine(EngineError),
    BadRequest(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(e) => write!(f, "Engine error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Engine(EngineError::Validation { .. }) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Engine(EngineError::Precondition(_)) => StatusCode::CONFLICT,
            Self::Engine(EngineError::Storage(StorageError::NotFound)) => StatusCode::NOT_FOUND,
            Self::Engine(EngineError::Storage(StorageError::ConstraintViolation(_))) => {
                StatusCode::CONFLICT
            }
            Self::Engine(EngineError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            Self::Engine(EngineError::Validation { field, reason }) => {
                json!({
                    "error": "Validation failed",
                    "field": field,
                    "reason": reason
                })
            }
            Self::Engine(EngineError::Conflict(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Engine(EngineError::Precondition(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Engine(EngineError::Storage(StorageError::NotFound)) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Engine(EngineError::Storage(StorageError::ConstraintViolation(msg))) => {
                json!({
                    "error": msg
                })
            }
            Self::Engine(EngineError::Storage(e)) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<EngineError> for WebError {
    fn from(error: EngineError) -> Self {
        Self::Engine(error)
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Engine(EngineError::Storage(error))
    }
}

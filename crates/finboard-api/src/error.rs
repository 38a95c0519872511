//! Error types for finboard-api
//!
//! Every failure leaving the server is `{ "error": "<message>" }` with a
//! 4xx/5xx status. Records that exist but belong to another user surface as
//! NotFound, never Forbidden, so foreign ids do not leak their existence.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finboard_core::CoreError;
use finboard_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound {
                resource: "record".to_string(),
            },
            StoreError::Database(e) => {
                log::error!("database error: {}", e);
                ApiError::InternalError
            }
            StoreError::Migration(e) => {
                log::error!("migration error: {}", e);
                ApiError::InternalError
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        log::debug!("rejected payload [{}]: {}", err.code(), err);
        ApiError::BadRequest {
            message: err.to_string(),
        }
    }
}

/// Result type with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

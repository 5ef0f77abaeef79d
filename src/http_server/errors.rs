//! # HTTP API Errors
//!
//! Maps service failures onto status codes. Client errors carry their
//! message; server errors are logged and answered with a generic one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::service::ServiceError;

/// Body of every 5xx response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Path names no known collection
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Body missing or not JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Client error reported as 400 regardless of its kind
    #[error("{0}")]
    BadRequest(String),

    // ==================
    // From the services
    // ==================
    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCollection(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(e) => match e {
                ServiceError::Validation(_) | ServiceError::InvalidKey { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Persistence(_) | ServiceError::Connection(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Update of a missing record answers 400, not 404.
    pub fn for_update(err: ServiceError) -> Self {
        if err.is_not_found() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Service(err)
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let status = err.status_code();
        let message = if status.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            err.to_string()
        };
        Self {
            error: message,
            code: status.as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

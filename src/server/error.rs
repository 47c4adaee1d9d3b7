//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::files::FileError;
use crate::form::ValidationError;
use crate::registry::InvokeError;
use crate::render::RenderError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Function not found error.
    pub fn function_not_found(name: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "FUNCTION_NOT_FOUND",
            format!("Function '{}' not found", name),
        )
        .with_details(serde_json::json!({ "function": name }))
    }

    /// File not found error.
    pub fn file_not_found(handle: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "FILE_NOT_FOUND",
            format!("File '{}' not found", handle),
        )
        .with_details(serde_json::json!({ "file_id": handle }))
    }

    /// Malformed multipart body error.
    pub fn bad_multipart(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_MULTIPART", message)
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            err.to_string(),
        )
        .with_details(serde_json::json!({ "param": err.param() }))
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnsupportedNesting => Self::new(
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_NESTING",
                err.to_string(),
            ),
            RenderError::File(e) => e.into(),
        }
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        match &err {
            FileError::NotFound(handle) => Self::file_not_found(handle),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<InvokeError> for ApiError {
    fn from(err: InvokeError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "FUNCTION_ERROR",
            err.to_string(),
        )
    }
}

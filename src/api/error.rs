//! Error responses.
//!
//! Every failure leaves the server as `{"success": false, "error": <code>,
//! "message": <text>}`, including malformed bodies, unknown routes, and panics.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;
use tracing::{error, warn};

/// A failure ready to be rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Builds an error with an explicit status, machine-readable code, and message.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// A 500 whose message reveals nothing about the cause.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error",
        )
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { message } => {
                Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
            }
            Error::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                err.to_string(),
            ),
            Error::UserNotFound { .. }
            | Error::CategoryNotFound { .. }
            | Error::ProductNotFound { .. }
            | Error::OrderNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "not_found", err.to_string())
            }
            Error::DuplicateUsername { .. }
            | Error::DuplicateCategory { .. }
            | Error::DuplicateReference { .. } => {
                Self::new(StatusCode::CONFLICT, "conflict", err.to_string())
            }
            other => {
                error!(error = %other, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => "invalid_json",
            JsonRejection::MissingJsonContentType(_) => "unsupported_media_type",
            _ => "bad_request",
        };
        Self::new(rejection.status(), code, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

/// Fallback for paths with no route.
pub async fn not_found(uri: Uri) -> ApiError {
    warn!(path = %uri.path(), "no route");
    ApiError::new(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("No route for {}", uri.path()),
    )
}

/// Fallback for known paths called with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "Method not allowed",
    )
}

/// Turns a handler panic into a JSON 500.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");
    ApiError::internal().into_response()
}

use std::any::Any;

use axum::{
    Extension,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use sellerhub_catalog::CatalogError;
use sellerhub_core::FieldErrors;

pub const VALIDATION_MESSAGE: &str = "validation error on fields";
pub const HIDDEN_FAULT_MESSAGE: &str = "internal server error";

/// Failure of an HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    Validation(FieldErrors),
    /// The request body could not be parsed.
    Malformed { status: StatusCode, message: String },
    NotFound,
    Fault(String),
}

/// What went wrong, attached to an error response for
/// [`crate::middleware::render_error_bodies`] to turn into a JSON body.
#[derive(Debug, Clone)]
pub enum ErrorDetail {
    Validation(FieldErrors),
    Malformed(String),
    Fault(String),
}

/// Wire shape of every non-empty error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub message: String,
    pub path: String,
}

impl ErrorDetail {
    pub fn into_body(self, status: StatusCode, path: String, expose_fault_details: bool) -> ErrorBody {
        let (errors, message) = match self {
            ErrorDetail::Validation(errors) => (Some(errors), VALIDATION_MESSAGE.to_string()),
            ErrorDetail::Malformed(message) => (None, message),
            ErrorDetail::Fault(message) if expose_fault_details => (None, message),
            ErrorDetail::Fault(_) => (None, HIDDEN_FAULT_MESSAGE.to_string()),
        };

        ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            errors,
            message,
            path,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Extension(ErrorDetail::Validation(errors))).into_response()
            }
            ApiError::Malformed { status, message } => {
                (status, Extension(ErrorDetail::Malformed(message))).into_response()
            }
            ApiError::Fault(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Extension(ErrorDetail::Fault(message)),
            )
                .into_response(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(errors) => ApiError::Validation(errors),
            CatalogError::NotFound(missing) => {
                tracing::debug!(%missing, "lookup failed");
                ApiError::NotFound
            }
            CatalogError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                ApiError::Fault(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Bodies serde refused are plain 400s, never axum's 422.
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::Malformed {
            status,
            message: rejection.body_text(),
        }
    }
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };

    tracing::error!(%message, "handler panicked");
    ApiError::Fault(message).into_response()
}

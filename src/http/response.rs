//! Handler-side response types.
//!
//! # Responsibilities
//! - Attach typed content to responses for the envelope filter
//! - Map application failures to status code + [`ErrorDescriptor`]
//!
//! # Design Decisions
//! - Bodies are still written as plain JSON so handlers behave sensibly
//!   when mounted without the filter
//! - The typed value rides in response extensions; the filter prefers it
//!   over re-parsing the body

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::envelope::{ErrorDescriptor, ExceptionInfo, ModelState, ResponseContent};

/// Successful handler output wrapped as `{"result": ...}` by the filter.
#[derive(Debug, Clone)]
pub struct Content<T>(pub T);

impl<T: Serialize> IntoResponse for Content<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.0) {
            Ok(value) => {
                let mut response = Json(value.clone()).into_response();
                response
                    .extensions_mut()
                    .insert(ResponseContent::Value(value));
                response
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize handler content");
                ApiError::internal(&err).into_response()
            }
        }
    }
}

/// A failed request: status plus a structured error description.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub descriptor: ErrorDescriptor,
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<Content<T>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            descriptor: ErrorDescriptor::new(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 400 carrying per-field validation messages.
    pub fn validation(model_state: ModelState) -> Self {
        let mut err = Self::bad_request("The request is invalid.");
        err.descriptor.model_state = Some(model_state);
        err
    }

    /// 500 built from an error value. The chain is kept as exception detail;
    /// whether it reaches the client is the filter's decision. Causes carry
    /// the erased `dyn Error` type name, see [`ExceptionInfo::from_error`].
    pub fn internal<E: StdError + 'static>(err: &E) -> Self {
        tracing::error!(error = %err, "Internal error");
        let exception = ExceptionInfo::from_error(err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            descriptor: ErrorDescriptor::new(exception.message.clone()).with_exception(exception),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.descriptor.message_detail = Some(detail.into());
        self
    }

    /// Replace the exception detail, e.g. with a chain whose cause types
    /// were named by the caller.
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.descriptor.exception = Some(exception);
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.descriptor.message)
    }
}

impl StdError for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Unfiltered fallback body; never includes exception detail.
        let mut body = json!({ "error": self.descriptor.message });
        if let Some(detail) = &self.descriptor.message_detail {
            body["errorDetail"] = Value::String(detail.clone());
        }

        let mut response = (self.status, Json(body)).into_response();
        response
            .extensions_mut()
            .insert(ResponseContent::Error(self.descriptor));
        response
    }
}

//! Envelope filter middleware.
//!
//! Wraps the inner pipeline: awaits its response, determines the content
//! value, and replaces the body with the JSON envelope. Status code and
//! non-content headers pass through unchanged.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::config::EnvelopeConfig;
use crate::envelope::{transform, ErrorDescriptor, ExceptionInfo, ResponseContent};

/// Immutable filter state shared by all requests.
#[derive(Debug, Clone)]
pub struct EnvelopeFilter {
    config: Arc<EnvelopeConfig>,
}

impl EnvelopeFilter {
    pub fn new(config: EnvelopeConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Rewrite one completed response.
    pub async fn apply(&self, response: Response) -> Response {
        if let Some(content_type) = content_type(response.headers()) {
            if self.config.is_passthrough(content_type) {
                tracing::trace!(content_type, "Passthrough content type, response untouched");
                return response;
            }
        }

        // Untyped bodies without a length bound are streams; buffering them
        // would never finish.
        if response.extensions().get::<ResponseContent>().is_none()
            && response.body().size_hint().upper().is_none()
        {
            tracing::trace!("Unbounded response body, response untouched");
            return response;
        }

        let (mut parts, body) = response.into_parts();

        let content = match parts.extensions.remove::<ResponseContent>() {
            Some(content) => Some(content),
            None => match axum::body::to_bytes(body, self.config.max_body_bytes).await {
                Ok(bytes) => classify_body(&parts.headers, bytes),
                Err(err) => {
                    tracing::error!(error = %err, "Failed to buffer response body");
                    parts.status = StatusCode::INTERNAL_SERVER_ERROR;
                    let exception = ExceptionInfo::from_error(&err);
                    Some(ResponseContent::Error(
                        ErrorDescriptor::new(exception.message.clone()).with_exception(exception),
                    ))
                }
            },
        };

        let envelope = transform(parts.status, content, self.config.debug_mode);
        let body = match envelope.to_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                // Envelope fields are strings and JSON values; this only
                // fails on a broken serializer.
                tracing::error!(error = %err, "Failed to serialize envelope");
                b"{}".to_vec()
            }
        };

        parts.headers.remove(header::CONTENT_LENGTH);
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Response::from_parts(parts, Body::from(body))
    }
}

/// Middleware entry point, mounted with `axum::middleware::from_fn_with_state`.
pub async fn envelope_middleware(
    State(filter): State<EnvelopeFilter>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    filter.apply(response).await
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Derive a content value from a raw body.
fn classify_body(headers: &HeaderMap, bytes: Bytes) -> Option<ResponseContent> {
    if bytes.is_empty() {
        return None;
    }

    if content_type(headers).is_some_and(is_json) {
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            return Some(ResponseContent::Value(value));
        }
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => Some(ResponseContent::Text(text)),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "Opaque response body dropped");
            None
        }
    }
}

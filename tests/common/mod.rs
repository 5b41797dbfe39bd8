//! Shared helpers for integration tests.

use std::fmt;

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceExt;

use response_envelope::config::AppConfig;
use response_envelope::http::{ApiError, ApiResult, Content, HttpServer};
use response_envelope::ModelState;

#[derive(Debug)]
pub struct Boom(pub Cause);

#[derive(Debug)]
pub struct Cause;

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boom")
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cause")
    }
}

impl std::error::Error for Boom {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl std::error::Error for Cause {}

#[derive(Serialize)]
struct Widget {
    id: u32,
    name: String,
    note: Option<String>,
}

async fn widget(Path(id): Path<u32>) -> ApiResult<Widget> {
    if id == 0 {
        return Err(ApiError::not_found("Widget not found.").with_detail("id 0 is reserved"));
    }
    Ok(Content(Widget {
        id,
        name: format!("widget-{id}"),
        note: None,
    }))
}

async fn validate() -> Result<Content<()>, ApiError> {
    Err(ApiError::validation(
        ModelState::new()
            .with_error("name", "required")
            .with_error("age", "must be positive"),
    ))
}

async fn explode() -> Result<Content<()>, ApiError> {
    Err(ApiError::internal(&Boom(Cause)))
}

async fn rejected() -> ApiError {
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "bad").with_detail("missing field")
}

async fn plain_text_error() -> Response {
    (StatusCode::FORBIDDEN, "not allowed").into_response()
}

async fn plain_text_ok() -> &'static str {
    "pong"
}

async fn redirect_text() -> Response {
    (StatusCode::FOUND, [("location", "/elsewhere")], "moved").into_response()
}

async fn raw_json() -> Json<Value> {
    Json(json!({ "items": [1, 2, 3], "cursor": null }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Router with handlers for every envelope case, wrapped like production.
pub fn build_test_app(debug_mode: bool) -> Router {
    let mut config = AppConfig::default();
    config.envelope.debug_mode = debug_mode;

    let app = Router::new()
        .route("/widgets/{id}", get(widget))
        .route("/validate", get(validate))
        .route("/explode", get(explode))
        .route("/rejected", get(rejected))
        .route("/forbidden", get(plain_text_error))
        .route("/ping", get(plain_text_ok))
        .route("/redirect", get(redirect_text))
        .route("/raw", get(raw_json))
        .route("/empty", get(no_content));

    HttpServer::new(config, app).into_router()
}

pub async fn send_get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

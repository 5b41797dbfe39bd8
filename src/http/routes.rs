//! Built-in routes served by the standalone binary.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use serde::Serialize;

use crate::http::response::Content;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Content<HealthStatus> {
    Content(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No route matched the request.")
}

/// Router with `/health` and a text 404 fallback.
pub fn service_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(not_found)
}

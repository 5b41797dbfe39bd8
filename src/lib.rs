//! JSON response envelope filter for axum services.
//!
//! Every response leaving the wrapped router is rewritten into one of:
//! `{}`, `{"result": ...}` or `{"error": ..., "errorDetail"?, "errors"?,
//! "exception"?}`. See [`envelope::transform`] for the selection rules and
//! [`http::EnvelopeFilter`] for the middleware.

pub mod config;
pub mod envelope;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, EnvelopeConfig};
pub use envelope::{Envelope, ErrorDescriptor, ExceptionInfo, ModelState, ResponseContent};
pub use http::{ApiError, Content, EnvelopeFilter, HttpServer};
pub use lifecycle::Shutdown;

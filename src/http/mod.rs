//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → application handlers (response.rs: Content / ApiError)
//!     → middleware.rs (envelope filter rewrites the body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use middleware::{envelope_middleware, EnvelopeFilter};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, ApiResult, Content};
pub use server::HttpServer;

//! Response envelope model and transformation.
//!
//! # Data Flow
//! ```text
//! handler
//!     → content.rs (ResponseContent attached to the response)
//!     → transform.rs (status + content + debug flag → Envelope)
//!     → types.rs (Envelope serialized as the JSON body)
//! ```
//!
//! # Design Decisions
//! - Envelope is a closed enum; unset fields are skipped, never null
//! - Debug disclosure is a runtime flag, not a build variant
//! - The transformation is pure and total over materialized content

pub mod content;
pub mod transform;
pub mod types;

pub use content::{ErrorDescriptor, ExceptionInfo, ModelState, ResponseContent};
pub use transform::{expand_error, resolve_exception, transform, INTERNAL_SERVER_ERROR_MESSAGE};
pub use types::{Envelope, ErrorEnvelope, ExceptionDescriptor};

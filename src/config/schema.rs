//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Response envelope behaviour.
    pub envelope: EnvelopeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Envelope filter configuration.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Include exception type, message and stack trace in error envelopes.
    /// Must stay off for production-facing deployments.
    pub debug_mode: bool,

    /// Upper bound when buffering a response body that carries no typed content.
    pub max_body_bytes: usize,

    /// Content-type prefixes returned untouched. Defaults to server-sent events.
    pub passthrough_content_types: Vec<String>,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            passthrough_content_types: vec!["text/event-stream".to_string()],
        }
    }
}

impl EnvelopeConfig {
    /// Whether responses with this content type bypass the filter.
    pub fn is_passthrough(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        self.passthrough_content_types
            .iter()
            .any(|prefix| content_type.starts_with(&prefix.to_ascii_lowercase()))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

//! Envelope selection for a completed response.
//!
//! # Rules
//! - no content → `{}`
//! - string content with a non-2xx status → `{"error": <string>}`
//! - structured error → expanded error object (500 hides the message)
//! - anything else → `{"result": <content>}`
//!
//! Exception detail is attached only when `debug_mode` is set.

use axum::http::StatusCode;

use super::content::{ErrorDescriptor, ExceptionInfo, ResponseContent};
use super::types::{Envelope, ErrorEnvelope, ExceptionDescriptor};

/// Message that replaces the error text of every 500 response.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error.";

/// Choose the envelope for one response.
pub fn transform(status: StatusCode, content: Option<ResponseContent>, debug_mode: bool) -> Envelope {
    let Some(content) = content else {
        tracing::trace!(%status, "No content, emitting empty envelope");
        return Envelope::empty();
    };

    if !status.is_success() {
        if let Some(text) = content.as_text() {
            tracing::trace!(%status, "String content on failure status");
            return Envelope::error(text);
        }
    }

    match content {
        ResponseContent::Error(mut descriptor) => {
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                descriptor.message = INTERNAL_SERVER_ERROR_MESSAGE.to_string();
            }
            tracing::trace!(%status, "Expanding structured error");
            Envelope::Error(expand_error(descriptor, debug_mode))
        }
        ResponseContent::Value(value) => Envelope::result(value),
        ResponseContent::Text(text) => Envelope::result(text.into()),
    }
}

/// Flatten an [`ErrorDescriptor`] into its wire form.
pub fn expand_error(descriptor: ErrorDescriptor, debug_mode: bool) -> ErrorEnvelope {
    let has_exception_message = descriptor
        .exception_message()
        .is_some_and(|message| !message.is_empty());

    let exception = if debug_mode && has_exception_message {
        resolve_exception(descriptor.exception.as_ref())
    } else {
        None
    };

    ErrorEnvelope {
        error: descriptor.message,
        error_detail: descriptor.message_detail,
        errors: descriptor.model_state.map(|state| state.flatten()),
        exception,
    }
}

/// Convert an exception chain into descriptors. `None` ends the chain.
pub fn resolve_exception(exception: Option<&ExceptionInfo>) -> Option<ExceptionDescriptor> {
    let exception = exception?;
    Some(ExceptionDescriptor {
        type_name: exception.type_name.clone(),
        message: exception.message.clone(),
        stack_trace_lines: stack_trace_lines(&exception.stack_trace),
        inner_exception: resolve_exception(exception.inner.as_deref()).map(Box::new),
    })
}

/// Split on `\n` or `\r\n`, keeping empty segments, and trim each line.
fn stack_trace_lines(stack_trace: &str) -> Vec<String> {
    stack_trace
        .split('\n')
        .map(|line| line.trim_end_matches('\r').trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::content::ModelState;
    use serde_json::{json, Value};

    fn render(status: StatusCode, content: Option<ResponseContent>, debug: bool) -> Value {
        serde_json::to_value(transform(status, content, debug)).unwrap()
    }

    fn boom_with_cause() -> ErrorDescriptor {
        ErrorDescriptor::new("bad").with_exception(
            ExceptionInfo::new("app::Boom", "boom")
                .with_stack_trace("  at handler\r\n   at router  \n")
                .with_inner(ExceptionInfo::new("std::io::Error", "cause")),
        )
    }

    #[test]
    fn absent_content_is_empty_object() {
        for status in [StatusCode::OK, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
            assert_eq!(render(status, None, false), json!({}));
        }
    }

    #[test]
    fn string_on_failure_is_error() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::FOUND,
        ] {
            let body = render(status, Some(ResponseContent::Text("denied".into())), false);
            assert_eq!(body, json!({ "error": "denied" }), "status {status}");
        }
    }

    #[test]
    fn string_on_success_is_result() {
        let body = render(StatusCode::OK, Some(ResponseContent::Text("hello".into())), false);
        assert_eq!(body, json!({ "result": "hello" }));

        let body = render(
            StatusCode::CREATED,
            Some(ResponseContent::Value(json!("made"))),
            false,
        );
        assert_eq!(body, json!({ "result": "made" }));
    }

    #[test]
    fn non_string_content_is_result_even_on_failure() {
        let body = render(
            StatusCode::CONFLICT,
            Some(ResponseContent::Value(json!({ "id": 3 }))),
            false,
        );
        assert_eq!(body, json!({ "result": { "id": 3 } }));
    }

    #[test]
    fn internal_server_error_hides_message() {
        for debug in [false, true] {
            let content = ResponseContent::Error(ErrorDescriptor::new("bad"));
            let body = render(StatusCode::INTERNAL_SERVER_ERROR, Some(content), debug);
            assert_eq!(body["error"], INTERNAL_SERVER_ERROR_MESSAGE);
        }
    }

    #[test]
    fn other_failures_keep_message_and_detail() {
        let content = ResponseContent::Error(ErrorDescriptor::new("bad").with_detail("field x"));
        let body = render(StatusCode::BAD_REQUEST, Some(content), false);
        assert_eq!(body, json!({ "error": "bad", "errorDetail": "field x" }));
    }

    #[test]
    fn model_state_is_flattened_in_field_order() {
        let state = ModelState::new()
            .with_error("name", "required")
            .with_error("age", "must be positive");
        let content = ResponseContent::Error(ErrorDescriptor::new("invalid").with_model_state(state));
        let body = render(StatusCode::BAD_REQUEST, Some(content), false);
        assert_eq!(body["errors"], json!(["required", "must be positive"]));
    }

    #[test]
    fn empty_model_state_still_emits_errors() {
        let content =
            ResponseContent::Error(ErrorDescriptor::new("invalid").with_model_state(ModelState::new()));
        let body = render(StatusCode::BAD_REQUEST, Some(content), false);
        assert_eq!(body, json!({ "error": "invalid", "errors": [] }));
    }

    #[test]
    fn debug_mode_includes_exception_chain() {
        let body = render(
            StatusCode::BAD_REQUEST,
            Some(ResponseContent::Error(boom_with_cause())),
            true,
        );

        let exception = &body["exception"];
        assert_eq!(exception["type"], "app::Boom");
        assert_eq!(exception["message"], "boom");
        assert_eq!(
            exception["stackTraceLines"],
            json!(["at handler", "at router", ""])
        );
        assert_eq!(exception["innerException"]["message"], "cause");
        assert_eq!(exception["innerException"]["stackTraceLines"], json!([""]));
        assert!(exception["innerException"].get("innerException").is_none());
    }

    #[test]
    fn exception_hidden_without_debug_mode() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::INTERNAL_SERVER_ERROR] {
            let body = render(status, Some(ResponseContent::Error(boom_with_cause())), false);
            assert!(body.get("exception").is_none());
        }
    }

    #[test]
    fn empty_exception_message_is_not_disclosed() {
        let descriptor = ErrorDescriptor::new("bad").with_exception(ExceptionInfo::new("T", ""));
        let envelope = expand_error(descriptor, true);
        assert!(envelope.exception.is_none());
    }

    #[test]
    fn stack_trace_keeps_empty_segments() {
        assert_eq!(stack_trace_lines(""), vec![""]);
        assert_eq!(stack_trace_lines("a\r\n\r\n  b\n"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn resolve_exception_of_none_is_none() {
        assert!(resolve_exception(None).is_none());
    }
}

//! Wire shapes of the response envelope.

use serde::Serialize;
use serde_json::Value;

/// Normalized top-level body of every response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    /// `{}`
    Empty(EmptyEnvelope),
    /// `{"error": ..., "errorDetail"?, "errors"?, "exception"?}`
    Error(ErrorEnvelope),
    /// `{"result": ...}`
    Result(ResultEnvelope),
}

impl Envelope {
    pub fn empty() -> Self {
        Envelope::Empty(EmptyEnvelope {})
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error(ErrorEnvelope::new(message))
    }

    /// Wrap a success payload. Null object members are dropped so the
    /// output never contains null-valued keys.
    pub fn result(content: Value) -> Self {
        Envelope::Result(ResultEnvelope {
            result: strip_nulls(content),
        })
    }

    /// Serialize to the JSON body bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyEnvelope {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    #[serde(skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionDescriptor>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_detail: None,
            errors: None,
            exception: None,
        }
    }
}

/// One node of a serialized exception chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDescriptor {
    #[serde(rename = "type")]
    pub type_name: String,
    pub message: String,
    pub stack_trace_lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_exception: Option<Box<ExceptionDescriptor>>,
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

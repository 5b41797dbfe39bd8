//! Typed response content handed from handlers to the envelope filter.
//!
//! Handlers attach a [`ResponseContent`] to the response extensions so the
//! filter can inspect the value they produced instead of re-parsing bytes.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;

use serde_json::Value;

/// The content value produced by the inner pipeline for one response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    /// Any serializable payload.
    Value(Value),
    /// A plain string payload.
    Text(String),
    /// A structured error.
    Error(ErrorDescriptor),
}

impl ResponseContent {
    /// Returns the payload as a string if it is one, either as raw text or
    /// as a JSON string value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseContent::Text(text) => Some(text),
            ResponseContent::Value(Value::String(text)) => Some(text),
            _ => None,
        }
    }
}

/// A structured error carried by a failed response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDescriptor {
    pub message: String,
    pub message_detail: Option<String>,
    pub model_state: Option<ModelState>,
    pub exception: Option<ExceptionInfo>,
}

impl ErrorDescriptor {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.message_detail = Some(detail.into());
        self
    }

    pub fn with_model_state(mut self, model_state: ModelState) -> Self {
        self.model_state = Some(model_state);
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Message of the outermost exception, if any.
    pub fn exception_message(&self) -> Option<&str> {
        self.exception.as_ref().map(|e| e.message.as_str())
    }
}

/// Validation failures keyed by field name.
///
/// Fields keep their insertion order so flattened output is stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelState {
    fields: Vec<(String, Vec<String>)>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, appending to earlier messages for it.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.fields.push((field, vec![message.into()])),
        }
    }

    /// Builder form of [`ModelState::add_error`].
    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add_error(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, messages)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Every message of every field, field order first, then message order.
    pub fn flatten(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(_, messages)| messages.iter().cloned())
            .collect()
    }
}

impl<K, V, I> FromIterator<(K, I)> for ModelState
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = V>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut state = ModelState::new();
        for (field, messages) in iter {
            let field = field.into();
            for message in messages {
                state.add_error(field.clone(), message);
            }
        }
        state
    }
}

/// Diagnostic detail of a failure and its causes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExceptionInfo {
    pub type_name: String,
    pub message: String,
    pub stack_trace: String,
    pub inner: Option<Box<ExceptionInfo>>,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = stack_trace.into();
        self
    }

    pub fn with_inner(mut self, inner: ExceptionInfo) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    /// Capture `err` and its `source()` chain.
    ///
    /// The outermost node records the concrete type name and a backtrace
    /// (when `RUST_BACKTRACE` enables capture). Causes are only reachable as
    /// `dyn Error`, so their `type_name` is always `dyn core::error::Error`
    /// and they carry no trace. Build the chain with [`ExceptionInfo::new`]
    /// and [`ExceptionInfo::with_inner`] when cause types matter.
    pub fn from_error<E: StdError + 'static>(err: &E) -> Self {
        let backtrace = Backtrace::capture();
        let stack_trace = match backtrace.status() {
            BacktraceStatus::Captured => backtrace.to_string(),
            _ => String::new(),
        };

        let mut info = ExceptionInfo::new(std::any::type_name::<E>(), err.to_string())
            .with_stack_trace(stack_trace);
        info.inner = err.source().map(|source| Box::new(Self::from_source(source)));
        info
    }

    fn from_source(err: &(dyn StdError + 'static)) -> Self {
        let mut info = ExceptionInfo::new(std::any::type_name_of_val(err), err.to_string());
        info.inner = err.source().map(|source| Box::new(Self::from_source(source)));
        info
    }

    /// Number of nodes in this chain, including `self`.
    pub fn depth(&self) -> usize {
        1 + self.inner.as_ref().map_or(0, |inner| inner.depth())
    }
}

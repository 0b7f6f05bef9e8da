//! Canonical JSON form of an error instance
//!
//! ```json
//! {
//!   "error": "not_found",
//!   "error_description": "missing",
//!   "error_data": { "id": 7 },
//!   "error_cause": { "error": "timeout" },
//!   "error_stack": [ { "invocation": "function", "name": "load", ... } ]
//! }
//! ```
//!
//! Every key but `error` is omitted when empty.

use faultline_core::{underscore_name, Cause, ErrorInstance, FaultlineError, Result};
use faultline_observability::spans;
use faultline_stack::{build_frames, default_resolver, PackageResolver, StackFrame};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_MAX_CAUSE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SerializedError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_cause: Option<Box<SerializedCause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_stack: Option<Vec<StackFrame>>,
}

/// A serialized error instance, or an object-shaped cause passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SerializedCause {
    Error(SerializedError),
    Value(Value),
}

impl SerializedCause {
    pub fn as_error(&self) -> Option<&SerializedError> {
        match self {
            Self::Error(error) => Some(error),
            Self::Value(_) => None,
        }
    }
}

impl SerializedError {
    pub fn cause_error(&self) -> Option<&SerializedError> {
        self.error_cause.as_deref().and_then(SerializedCause::as_error)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    pub max_cause_depth: usize,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cause_depth(mut self, max_cause_depth: usize) -> Self {
        self.max_cause_depth = max_cause_depth;
        self
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }
}

pub struct Serializer<'r> {
    resolver: &'r dyn PackageResolver,
    options: SerializeOptions,
}

impl<'r> Serializer<'r> {
    pub fn new(resolver: &'r dyn PackageResolver) -> Self {
        Self {
            resolver,
            options: SerializeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn serialize(&self, error: &ErrorInstance) -> Result<SerializedError> {
        let span = spans::serialize_error(error.name());
        let _guard = span.enter();
        self.serialize_at(error, 0)
    }

    /// Structured frames for the instance's call sites, if it has any.
    pub fn stack(&self, error: &ErrorInstance) -> Option<Vec<StackFrame>> {
        let call_sites = error.call_sites();
        if call_sites.is_empty() {
            None
        } else {
            Some(build_frames(call_sites, self.resolver))
        }
    }

    fn serialize_at(&self, error: &ErrorInstance, depth: usize) -> Result<SerializedError> {
        if depth > self.options.max_cause_depth {
            tracing::warn!(
                max_depth = self.options.max_cause_depth,
                "Cause chain too deep to serialize"
            );
            return Err(FaultlineError::CauseDepthExceeded {
                max_depth: self.options.max_cause_depth,
            });
        }

        let error_cause = match error.cause() {
            Some(Cause::Error(cause)) => Some(SerializedCause::Error(
                self.serialize_at(cause, depth + 1)?,
            )),
            Some(Cause::Value(value)) => Some(SerializedCause::Value(value.clone())),
            None => None,
        };

        Ok(SerializedError {
            error: underscore_name(error.name()),
            error_description: error.message().map(str::to_string),
            error_data: Some(error.data().clone()).filter(|data| !data.is_empty()),
            error_cause: error_cause.map(Box::new),
            error_stack: self.stack(error),
        })
    }
}

/// Serialize through the process-wide manifest resolver.
pub fn serialize(error: &ErrorInstance) -> Result<SerializedError> {
    Serializer::new(default_resolver()).serialize(error)
}

/// Adapter that lets an [`ErrorInstance`] sit inside any `Serialize` value.
pub struct AsJson<'a>(pub &'a ErrorInstance);

impl Serialize for AsJson<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serialize(self.0)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

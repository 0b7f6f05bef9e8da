//! Error instances and their construction.

use crate::call_site::RawCallSite;
use crate::kind::{registry, ErrorKind, KindRegistry};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// An object-shaped cause. Non-object cause values are kept as plain data.
#[derive(Debug, Clone)]
pub enum Cause {
    Error(Arc<ErrorInstance>),
    Value(Value),
}

impl Cause {
    /// Accept objects and arrays; hand any other value back.
    pub fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self::Value(value)),
            other => Err(other),
        }
    }

    pub fn as_error(&self) -> Option<&ErrorInstance> {
        match self {
            Self::Error(error) => Some(error.as_ref()),
            Self::Value(_) => None,
        }
    }
}

impl From<ErrorInstance> for Cause {
    fn from(error: ErrorInstance) -> Self {
        Self::Error(Arc::new(error))
    }
}

impl From<Arc<ErrorInstance>> for Cause {
    fn from(error: Arc<ErrorInstance>) -> Self {
        Self::Error(error)
    }
}

/// Construction parameters: a message, extra fields and an optional cause.
#[derive(Debug, Clone, Default)]
pub struct Params {
    message: Option<String>,
    fields: Map<String, Value>,
    cause: Option<Cause>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into()).filter(|message| !message.is_empty());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "message" {
            self.message = message_text(&value);
        } else {
            self.fields.insert(key, value);
        }
        self
    }

    pub fn cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&str> for Params {
    fn from(message: &str) -> Self {
        Self::new().message(message)
    }
}

impl From<String> for Params {
    fn from(message: String) -> Self {
        Self::new().message(message)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(mut fields: Map<String, Value>) -> Self {
        let message = fields.remove("message").and_then(|value| message_text(&value));
        Self {
            message,
            fields,
            cause: None,
        }
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => fields.into(),
            Value::String(message) => message.into(),
            _ => Self::default(),
        }
    }
}

/// Stringify a field value the way a message is read from loose input.
fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Some(text).filter(|text| !text.is_empty())
}

/// A concrete error value.
#[derive(Debug, Clone)]
pub struct ErrorInstance {
    kind: Arc<ErrorKind>,
    name: Option<String>,
    message: Option<String>,
    data: Map<String, Value>,
    cause: Option<Cause>,
    call_sites: Vec<RawCallSite>,
    stack: Option<String>,
}

impl ErrorInstance {
    pub fn new(kind: Arc<ErrorKind>) -> Self {
        Self {
            kind,
            name: None,
            message: None,
            data: Map::new(),
            cause: None,
            call_sites: Vec::new(),
            stack: None,
        }
    }

    /// Convert a std error and its `source()` chain into instances of the
    /// base kind.
    pub fn from_std_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut messages = Vec::new();
        let mut current = Some(error);
        while let Some(error) = current {
            messages.push(error.to_string());
            current = error.source();
        }

        let base = registry().base();
        messages
            .into_iter()
            .rev()
            .fold(None, |cause: Option<ErrorInstance>, message| {
                let mut instance = ErrorInstance::new(base.clone()).with_message(message);
                instance.cause = cause.map(Cause::from);
                Some(instance)
            })
            .unwrap_or_else(|| ErrorInstance::new(base))
    }

    pub fn kind(&self) -> &Arc<ErrorKind> {
        &self.kind
    }

    /// Display name: an explicit `name` field, else the kind name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.name())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn call_sites(&self) -> &[RawCallSite] {
        &self.call_sites
    }

    /// Raw textual stack, when the host supplied one.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn is_a(&self, kind: &ErrorKind) -> bool {
        self.kind.is_a(kind)
    }

    /// Set a field. `name`, `message`, `stack` and object-shaped `cause`
    /// values update the instance itself; everything else lands in data.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "name" => self.name = message_text(&value),
            "message" => self.message = message_text(&value),
            "stack" => {
                if let Value::String(stack) = value {
                    self.stack = Some(stack);
                }
            }
            "cause" => match Cause::from_value(value) {
                Ok(cause) => {
                    self.data.remove("cause");
                    self.cause = Some(cause);
                }
                Err(value) => {
                    self.cause = None;
                    self.data.insert(key, value);
                }
            },
            _ => {
                self.data.insert(key, value);
            }
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into()).filter(|message| !message.is_empty());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.data.remove("cause");
        self.cause = Some(cause.into());
        self
    }

    pub fn with_call_sites(mut self, call_sites: Vec<RawCallSite>) -> Self {
        self.call_sites = call_sites;
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

impl fmt::Display for ErrorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {}", self.name(), message),
            None => f.write_str(self.name()),
        }
    }
}

impl std::error::Error for ErrorInstance {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .and_then(Cause::as_error)
            .map(|error| error as &(dyn std::error::Error + 'static))
    }
}

impl KindRegistry {
    /// Build an instance of the kind named `name`, registering it if new.
    pub fn create(&self, name: &str, params: impl Into<Params>) -> ErrorInstance {
        let Params {
            message,
            fields,
            cause,
        } = params.into();

        let mut instance = ErrorInstance::new(self.get(name));
        instance.message = message;
        for (key, value) in fields {
            instance.set(key, value);
        }
        if let Some(cause) = cause {
            instance = instance.with_cause(cause);
        }
        instance
    }
}

/// Create an instance through the process-wide registry.
pub fn create(name: &str, params: impl Into<Params>) -> ErrorInstance {
    registry().create(name, params)
}

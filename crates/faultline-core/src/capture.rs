//! Capture documents: how a host hands a captured error over as JSON.

use crate::call_site::RawCallSite;
use crate::error::{FaultlineError, Result};
use crate::instance::ErrorInstance;
use crate::kind::KindRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ErrorCapture {
    pub name: Option<String>,
    pub message: Option<String>,
    pub data: Map<String, Value>,
    pub call_site: Vec<RawCallSite>,
    pub stack: Option<String>,
    pub cause: Option<Box<CaptureCause>>,
}

/// A nested capture, or any other JSON value given as the cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureCause {
    Capture(ErrorCapture),
    Value(Value),
}

impl ErrorCapture {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(FaultlineError::InvalidCapture(
                "capture document must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn into_instance(self, registry: &KindRegistry) -> ErrorInstance {
        let mut instance = ErrorInstance::new(registry.get(self.name.as_deref().unwrap_or_default()));
        if let Some(message) = self.message {
            instance = instance.with_message(message);
        }
        for (key, value) in self.data {
            instance.set(key, value);
        }
        if let Some(stack) = self.stack {
            instance = instance.with_stack(stack);
        }
        instance = instance.with_call_sites(self.call_site);

        match self.cause.map(|cause| *cause) {
            Some(CaptureCause::Capture(capture)) => {
                instance.with_cause(capture.into_instance(registry))
            }
            Some(CaptureCause::Value(value)) => instance.with_field("cause", value),
            None => instance,
        }
    }
}

//! Structured errors with stable JSON and text renderings.
//!
//! Kinds are minted on demand by name and shared for the life of the
//! process. Instances carry a message, a data bag, an optional cause and the
//! raw call sites captured by the host.
//!
//! ```
//! use serde_json::json;
//!
//! let error = faultline::create("NotFound", json!({ "message": "missing", "id": 7 }));
//! let serialized = faultline::serialize(&error).unwrap();
//! assert_eq!(serialized.error, "not_found");
//! assert!(faultline::format(&error).starts_with("NotFound: missing"));
//! ```

pub use faultline_core::{
    declare_error_kind, registry, underscore_name, CallSite, Cause, ErrorCapture, ErrorInstance,
    ErrorKind, FaultlineError, KindRegistry, Params, RawCallSite, Result,
};
pub use faultline_stack::package::DEFAULT_MANIFEST;
pub use faultline_stack::{
    build_frame, build_frames, default_resolver, parse_origin, Invocation, Location,
    ManifestResolver, Origin, PackageInfo, PackageResolver, RuntimeInfo, RuntimeResolver,
    StackFrame, StaticResolver,
};

#[cfg(feature = "report")]
pub use faultline_report::{
    serialized_error_schema, AsJson, ErrorLike, FormatOptions, Formatter, Palette,
    SerializeOptions, SerializedCause, SerializedError, Serializer,
};

#[cfg(feature = "observability")]
pub use faultline_observability::init_tracing;

use std::sync::Arc;

/// Kind registered under `name` in the process-wide registry.
pub fn get_kind(name: &str) -> Arc<ErrorKind> {
    faultline_core::get_kind(name)
}

/// New instance of the kind named `name`.
pub fn create(name: &str, params: impl Into<Params>) -> ErrorInstance {
    faultline_core::create(name, params)
}

#[cfg(feature = "report")]
pub fn serialize(error: &ErrorInstance) -> Result<SerializedError> {
    faultline_report::serialize(error)
}

/// Uncolored report with default limits.
#[cfg(feature = "report")]
pub fn format<'a>(value: impl Into<ErrorLike<'a>>) -> String {
    faultline_report::format(value, &FormatOptions::default())
}

#[cfg(feature = "report")]
pub fn format_with<'a>(value: impl Into<ErrorLike<'a>>, options: &FormatOptions) -> String {
    faultline_report::format(value, options)
}

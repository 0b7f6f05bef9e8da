//! Faultline core types: the error kind registry, error instances and the
//! raw call-site records a host hands over for stack structuring.

pub mod call_site;
pub mod capture;
pub mod error;
pub mod instance;
pub mod kind;

pub use call_site::{CallSite, RawCallSite};
pub use capture::ErrorCapture;
pub use error::{FaultlineError, Result};
pub use instance::{create, Cause, ErrorInstance, Params};
pub use kind::{get_kind, registry, underscore_name, ErrorKind, KindDeclaration, KindRegistry};

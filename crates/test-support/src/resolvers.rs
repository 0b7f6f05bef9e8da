//! Resolver fixtures.

use faultline_stack::{RuntimeInfo, StaticResolver};

pub const APP_ROOT: &str = "/srv/app";
pub const RUNTIME: (&str, &str) = ("node", "20.11.0");

/// `app@1.2.0` rooted at [`APP_ROOT`], `left-pad@1.3.0` vendored below it,
/// and the runtime for non-absolute paths.
pub fn app_resolver() -> StaticResolver {
    StaticResolver::new()
        .with_runtime(RuntimeInfo::new(RUNTIME.0, RUNTIME.1))
        .with_package("app", "1.2.0", APP_ROOT)
        .with_package("left-pad", "1.3.0", "/srv/app/node_modules/left-pad")
}

//! Shared fixtures for faultline tests.

pub mod call_sites;
pub mod resolvers;

pub use call_sites::CallSiteFixture;
pub use resolvers::{app_resolver, APP_ROOT, RUNTIME};

//! Stack structuring: origin strings, call-site frames and package lookup.

pub mod frame;
pub mod origin;
pub mod package;

pub use frame::{build_frame, build_frames, Invocation, StackFrame};
pub use origin::{parse_origin, Location, Origin};
pub use package::{
    default_resolver, ManifestResolver, PackageInfo, PackageResolver, RuntimeInfo,
    RuntimeResolver, StaticResolver,
};

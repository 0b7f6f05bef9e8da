//! Turning error instances and error-shaped values into JSON and text.

pub mod format;
pub mod schema;
pub mod serialize;
pub mod style;

pub use format::{format, ErrorLike, FormatOptions, Formatter};
pub use schema::serialized_error_schema;
pub use serialize::{serialize, AsJson, SerializeOptions, SerializedCause, SerializedError, Serializer};
pub use style::Palette;

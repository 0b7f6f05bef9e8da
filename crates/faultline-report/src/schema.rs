use crate::serialize::SerializedError;
use schemars::Schema;

/// JSON schema describing the serialized error document.
pub fn serialized_error_schema() -> Schema {
    schemars::schema_for!(SerializedError)
}

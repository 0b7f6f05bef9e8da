//! Span constructors shared by the serializer, the formatter and the CLI.

use tracing::Span;

pub fn serialize_error(name: &str) -> Span {
    tracing::debug_span!("faultline.serialize", error.name = name)
}

pub fn format_report(shape: &'static str) -> Span {
    tracing::debug_span!("faultline.format", input.shape = shape)
}

pub fn cli_command(command: &'static str) -> Span {
    tracing::info_span!("faultline.cli", command = command)
}

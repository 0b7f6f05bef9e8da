use crate::config::{CliConfig, Command};
use anyhow::Context;
use faultline::{
    get_kind, parse_origin, registry, serialized_error_schema, ErrorCapture, FormatOptions,
    Formatter, ManifestResolver, Serializer,
};
use faultline_observability::spans;
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;

const STDIN: &str = "-";

/// Run one command and return what it prints.
pub fn run(config: &CliConfig) -> anyhow::Result<String> {
    let span = spans::cli_command(config.command.label());
    let _guard = span.enter();

    let resolver =
        ManifestResolver::new(config.runtime.clone()).with_manifest_name(&config.manifest_name);

    match &config.command {
        Command::Serialize { input } => {
            let capture = read_capture(input)?;
            let error = capture.into_instance(registry());
            let serialized = Serializer::new(&resolver)
                .serialize(&error)
                .context("Failed to serialize error")?;
            Ok(serde_json::to_string_pretty(&serialized)?)
        }
        Command::Format { input, capture } => {
            let options = FormatOptions::new().with_color(config.color);
            let formatter = Formatter::with_options(&resolver, options);
            if *capture {
                let error = read_capture(input)?.into_instance(registry());
                Ok(formatter.format(&error))
            } else {
                let raw = read_input(input)?;
                let value: Value = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid JSON in {}", input.display()))?;
                Ok(formatter.format(&value))
            }
        }
        Command::Origin { raw } => Ok(serde_json::to_string_pretty(&parse_origin(raw))?),
        Command::Kind { list: true, .. } => {
            let registry = registry();
            let described = json!({
                "count": registry.len(),
                "kinds": registry.names(),
            });
            Ok(serde_json::to_string_pretty(&described)?)
        }
        Command::Kind { name, .. } => {
            let kind = get_kind(name.as_deref().unwrap_or_default());
            let ancestry: Vec<&str> = kind.ancestry().map(|kind| kind.name()).collect();
            let described = json!({
                "name": kind.name(),
                "code": kind.code(),
                "ancestry": ancestry,
            });
            Ok(serde_json::to_string_pretty(&described)?)
        }
        Command::Schema => Ok(serde_json::to_string_pretty(&serialized_error_schema())?),
    }
}

fn read_capture(input: &Path) -> anyhow::Result<ErrorCapture> {
    let raw = read_input(input)?;
    ErrorCapture::from_json_str(&raw)
        .with_context(|| format!("Invalid capture document in {}", input.display()))
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == STDIN {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

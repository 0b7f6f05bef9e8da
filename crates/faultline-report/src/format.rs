//! Human-readable error reports
//!
//! Any error-like input is first normalized to a name, a message, a data
//! block, a stack block and an optional cause, then rendered as:
//!
//! ```text
//! QueryFailed: query failed
//!     {
//!       "query": "SELECT 1"
//!     }
//!     at main (app@1.2.0 /index.js:3:1)
//! caused by ConnectionRefused: connect refused
//! ```

use crate::serialize::{Serializer, DEFAULT_MAX_CAUSE_DEPTH};
use crate::style::Palette;
use faultline_core::{Cause, ErrorInstance};
use faultline_observability::spans;
use faultline_stack::{default_resolver, Origin, PackageInfo, PackageResolver, StackFrame};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const OBJECT_NAME: &str = "Error object";
const ARRAY_NAME: &str = "Error array";
const VALUE_NAME: &str = "Error value";
const ANONYMOUS: &str = "<anonymous>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub color: bool,
    pub max_cause_depth: usize,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_max_cause_depth(mut self, max_cause_depth: usize) -> Self {
        self.max_cause_depth = max_cause_depth;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            color: false,
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }
}

/// Anything the formatter accepts.
#[derive(Debug, Clone, Copy)]
pub enum ErrorLike<'a> {
    Error(&'a ErrorInstance),
    Value(&'a Value),
}

impl ErrorLike<'_> {
    fn shape(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Value(Value::Object(_)) => "object",
            Self::Value(Value::Array(_)) => "array",
            Self::Value(_) => "value",
        }
    }
}

impl<'a> From<&'a ErrorInstance> for ErrorLike<'a> {
    fn from(error: &'a ErrorInstance) -> Self {
        Self::Error(error)
    }
}

impl<'a> From<&'a Value> for ErrorLike<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Value(value)
    }
}

impl<'a> From<&'a Cause> for ErrorLike<'a> {
    fn from(cause: &'a Cause) -> Self {
        match cause {
            Cause::Error(error) => Self::Error(error.as_ref()),
            Cause::Value(value) => Self::Value(value),
        }
    }
}

/// One level of a report before rendering.
struct Normalized<'a> {
    name: String,
    message: String,
    data: Option<Value>,
    stack: String,
    cause: Option<ErrorLike<'a>>,
}

pub struct Formatter<'r> {
    resolver: &'r dyn PackageResolver,
    options: FormatOptions,
    palette: Palette,
}

impl<'r> Formatter<'r> {
    pub fn new(resolver: &'r dyn PackageResolver) -> Self {
        Self::with_options(resolver, FormatOptions::default())
    }

    pub fn with_options(resolver: &'r dyn PackageResolver, options: FormatOptions) -> Self {
        Self {
            resolver,
            options,
            palette: Palette::new(options.color),
        }
    }

    pub fn format<'a>(&self, value: impl Into<ErrorLike<'a>>) -> String {
        let value = value.into();
        let span = spans::format_report(value.shape());
        let _guard = span.enter();

        let mut text = String::new();
        self.render(value, 0, &mut text);
        text
    }

    fn render(&self, value: ErrorLike<'_>, depth: usize, out: &mut String) {
        let normalized = self.normalize(value);

        let name = normalized.name.trim();
        let name = if name.is_empty() { OBJECT_NAME } else { name };
        let message = normalized.message.trim();
        if message.is_empty() {
            out.push_str(&self.palette.name(name));
        } else {
            out.push_str(&self.palette.name(&format!("{name}: ")));
            out.push_str(&self.palette.message(message));
        }

        if let Some(data) = normalized.data.as_ref().filter(|data| !is_empty(data)) {
            let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            let indented = pretty
                .lines()
                .map(|line| format!("    {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            out.push('\n');
            out.push_str(&self.palette.muted(&indented));
        }

        if !normalized.stack.is_empty() {
            out.push('\n');
            out.push_str(&normalized.stack);
        }

        if let Some(cause) = normalized.cause {
            out.push_str("\ncaused by ");
            if depth >= self.options.max_cause_depth {
                tracing::warn!(
                    max_depth = self.options.max_cause_depth,
                    "Cause chain truncated in report"
                );
                out.push_str(&self.palette.muted(&format!(
                    "(cause chain truncated after {} levels)",
                    self.options.max_cause_depth
                )));
            } else {
                self.render(cause, depth + 1, out);
            }
        }
    }

    fn normalize<'a>(&self, value: ErrorLike<'a>) -> Normalized<'a> {
        match value {
            ErrorLike::Error(error) => self.normalize_error(error),
            ErrorLike::Value(Value::Object(map)) => self.normalize_object(map),
            ErrorLike::Value(Value::Array(items)) => Normalized {
                name: ARRAY_NAME.to_string(),
                message: String::new(),
                data: Some(Value::Array(items.clone())),
                stack: String::new(),
                cause: None,
            },
            ErrorLike::Value(primitive) => Normalized {
                name: VALUE_NAME.to_string(),
                message: match primitive {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                },
                data: None,
                stack: String::new(),
                cause: None,
            },
        }
    }

    fn normalize_error<'a>(&self, error: &'a ErrorInstance) -> Normalized<'a> {
        let stack = match Serializer::new(self.resolver).stack(error) {
            Some(frames) => self.render_frames(&frames),
            None => error
                .stack()
                .and_then(trim_text_stack)
                .unwrap_or_default()
                .to_string(),
        };

        Normalized {
            name: error.name().to_string(),
            message: error.message().unwrap_or_default().to_string(),
            data: Some(Value::Object(error.data().clone())),
            stack,
            cause: error.cause().map(ErrorLike::from),
        }
    }

    fn normalize_object<'a>(&self, map: &'a Map<String, Value>) -> Normalized<'a> {
        let mut data = map.clone();

        let name = if let Some(error) = map.get("error").filter(|value| truthy(value)) {
            data.remove("error");
            text_of(error)
        } else if let Some(name) = map.get("name").filter(|value| truthy(value)) {
            data.remove("name");
            text_of(name)
        } else {
            OBJECT_NAME.to_string()
        };

        let message = if let Some(description) =
            map.get("error_description").filter(|value| truthy(value))
        {
            data.remove("error_description");
            text_of(description)
        } else if let Some(message) = map.get("message").filter(|value| truthy(value)) {
            data.remove("message");
            text_of(message)
        } else {
            String::new()
        };

        // Flattened only when no key clashes with a top-level field.
        if let Some(Value::Object(fields)) = map.get("error_data") {
            data.remove("error_data");
            if fields.keys().any(|key| data.contains_key(key)) {
                data.insert("error_data".to_string(), Value::Object(fields.clone()));
            } else {
                data.extend(fields.clone());
            }
        }

        let mut stack = String::new();
        if let Some(Value::String(raw)) = map.get("stack") {
            if let Some(trimmed) = trim_text_stack(raw) {
                stack = trimmed.to_string();
                data.remove("stack");
            }
        } else if let Some(frames) = map
            .get("error_stack")
            .and_then(|value| Vec::<StackFrame>::deserialize(value).ok())
            .filter(|frames| !frames.is_empty())
        {
            stack = self.render_frames(&frames);
            data.remove("error_stack");
        }

        let mut cause = None;
        for key in ["cause", "error_cause"] {
            if let Some(value) = map.get(key).filter(|value| value.is_object() || value.is_array()) {
                data.remove(key);
                cause = Some(ErrorLike::Value(value));
                break;
            }
        }

        Normalized {
            name,
            message,
            data: Some(Value::Object(data)),
            stack,
            cause,
        }
    }

    fn render_frames(&self, frames: &[StackFrame]) -> String {
        frames
            .iter()
            .map(|frame| self.render_frame(frame))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_frame(&self, frame: &StackFrame) -> String {
        let location = frame_text(frame);
        match frame.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => format!(
                "    at{} {}",
                self.palette.frame_name(&format!(" {name}")),
                self.palette.muted(&format!("({location})"))
            ),
            None => format!("    at {}", self.palette.muted(&location)),
        }
    }
}

/// `<origin>, <location>` for frames evaluated elsewhere, else the location.
fn frame_text(frame: &StackFrame) -> String {
    let location = location_text(
        frame.filename.as_deref(),
        frame.pkg.as_ref(),
        frame.line,
        frame.column,
    );
    match frame.origin.as_ref() {
        Some(origin) => format!("{}, {location}", origin_text(origin)),
        None => location,
    }
}

fn origin_text(origin: &Origin) -> String {
    match origin {
        Origin::Nested {
            invocation,
            name,
            origin,
        } => format!(
            "{invocation} at {} ({})",
            name.as_deref().unwrap_or(ANONYMOUS),
            origin_text(origin)
        ),
        Origin::Located(location) => location_text(
            Some(&location.filename),
            location.pkg.as_ref(),
            Some(location.line),
            Some(location.column),
        ),
        Origin::Bare { name } => name.clone(),
    }
}

fn location_text(
    filename: Option<&str>,
    pkg: Option<&PackageInfo>,
    line: Option<u32>,
    column: Option<u32>,
) -> String {
    let filename = filename.unwrap_or_default();
    let shortened = pkg.map_or(filename, |pkg| pkg.shorten(filename));

    let mut text = String::new();
    if let Some(pkg) = pkg {
        text.push_str(&format!("{pkg} "));
    }
    text.push_str(if shortened.is_empty() { ANONYMOUS } else { shortened });
    if let Some(line) = line.filter(|line| *line != 0) {
        text.push_str(&format!(":{line}"));
        if let Some(column) = column.filter(|column| *column != 0) {
            text.push_str(&format!(":{column}"));
        }
    }
    text
}

fn first_frame_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n.* +at +").expect("stack frame pattern is valid"))
}

/// Drop the header of a textual stack, keeping the first `at` line onward.
/// `None` when the text has no frame lines.
fn trim_text_stack(stack: &str) -> Option<&str> {
    first_frame_pattern()
        .find(stack)
        .map(|found| &stack[found.start() + 1..])
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Null => true,
        _ => false,
    }
}

/// Format through the process-wide manifest resolver.
pub fn format<'a>(value: impl Into<ErrorLike<'a>>, options: &FormatOptions) -> String {
    Formatter::with_options(default_resolver(), *options).format(value)
}

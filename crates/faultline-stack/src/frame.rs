//! Structured stack frames built from raw call-site records.

use crate::origin::{parse_origin, Origin};
use crate::package::{PackageInfo, PackageResolver};
use faultline_core::CallSite;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic receiver type name that carries no information at top level.
const GENERIC_TYPE_NAME: &str = "Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Invocation {
    Toplevel,
    Eval,
    Native,
    Constructor,
    Function,
}

impl Invocation {
    /// First matching predicate wins, in priority order.
    pub fn of<C: CallSite + ?Sized>(call_site: &C) -> Self {
        if call_site.is_toplevel() {
            Self::Toplevel
        } else if call_site.is_eval() {
            Self::Eval
        } else if call_site.is_native() {
            Self::Native
        } else if call_site.is_constructor() {
            Self::Constructor
        } else {
            Self::Function
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toplevel => "toplevel",
            Self::Eval => "eval",
            Self::Native => "native",
            Self::Constructor => "constructor",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StackFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg: Option<PackageInfo>,
    pub invocation: Invocation,
    pub name: Option<String>,
    pub filename: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    /// Present only when the frame was evaluated somewhere other than its
    /// own file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

/// Qualified display name: `Type.function`, `Type.method`,
/// `Type.<anonymous>`, or the bare function/method name.
fn compose_name<C: CallSite + ?Sized>(call_site: &C, invocation: Invocation) -> Option<String> {
    let type_name = call_site
        .type_name()
        .filter(|name| !name.is_empty())
        .filter(|name| !(invocation == Invocation::Toplevel && *name == GENERIC_TYPE_NAME));
    let function_name = call_site.function_name().filter(|name| !name.is_empty());
    let method_name = call_site.method_name().filter(|name| !name.is_empty());

    match (type_name, function_name, method_name) {
        (Some(type_name), Some(function_name), _) => {
            if function_name
                .strip_prefix(type_name)
                .is_some_and(|rest| rest.starts_with('.'))
            {
                Some(function_name.to_string())
            } else {
                Some(format!("{type_name}.{function_name}"))
            }
        }
        (Some(type_name), None, Some(method_name)) => Some(format!("{type_name}.{method_name}")),
        (Some(type_name), None, None) => Some(format!("{type_name}.<anonymous>")),
        (None, function_name, method_name) => function_name.or(method_name).map(str::to_string),
    }
}

/// Build a structured frame from one raw call-site record.
///
/// A blank eval origin counts as no origin.
pub fn build_frame<C, R>(call_site: &C, resolver: &R) -> StackFrame
where
    C: CallSite + ?Sized,
    R: PackageResolver + ?Sized,
{
    let invocation = Invocation::of(call_site);
    let filename = call_site.file_name().map(str::to_string);

    let origin = match call_site.eval_origin() {
        Some(raw) if !raw.trim().is_empty() && Some(raw) != filename.as_deref() => {
            let mut origin = parse_origin(raw);
            if let Some(location) = origin.location_mut() {
                location.pkg = resolver.resolve(&location.filename);
            }
            Some(origin)
        }
        _ => None,
    };

    StackFrame {
        pkg: filename.as_deref().and_then(|filename| resolver.resolve(filename)),
        invocation,
        name: compose_name(call_site, invocation),
        filename,
        line: call_site.line_number(),
        column: call_site.column_number(),
        origin,
    }
}

/// Build frames for a whole call-site sequence, preserving order.
pub fn build_frames<C, R>(call_sites: &[C], resolver: &R) -> Vec<StackFrame>
where
    C: CallSite,
    R: PackageResolver + ?Sized,
{
    call_sites
        .iter()
        .map(|call_site| build_frame(call_site, resolver))
        .collect()
}

//! Origin strings
//!
//! An origin describes where a frame's code was defined. Engines report it
//! as strings like `eval at render (/srv/app/view.js:10:5)`, nesting once per
//! level of `eval`. Parsing never fails: input that matches neither the
//! nested nor the located form becomes a bare name.

use crate::package::PackageInfo;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const ANONYMOUS: &str = "<anonymous>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Origin {
    /// `<invocation> at <name> (<origin>)`
    Nested {
        invocation: String,
        name: Option<String>,
        origin: Box<Origin>,
    },
    /// `<filename>:<line>:<column>`
    Located(Location),
    /// Anything else, kept verbatim.
    Bare { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub filename: String,
    pub line: u32,
    pub column: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg: Option<PackageInfo>,
}

impl Origin {
    /// Innermost origin of a nested chain.
    pub fn innermost(&self) -> &Origin {
        let mut current = self;
        while let Origin::Nested { origin, .. } = current {
            current = origin;
        }
        current
    }

    /// Number of nested invocation levels above the innermost origin.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Origin::Nested { origin, .. } = current {
            depth += 1;
            current = origin;
        }
        depth
    }

    pub(crate) fn location_mut(&mut self) -> Option<&mut Location> {
        match self {
            Origin::Nested { origin, .. } => origin.location_mut(),
            Origin::Located(location) => Some(location),
            Origin::Bare { .. } => None,
        }
    }
}

fn nested_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)\((.+)\)$").expect("nested origin pattern is valid"))
}

fn located_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+):(\d+):(\d+)$").expect("located origin pattern is valid"))
}

/// Parse a raw origin string. Total: every input yields an [`Origin`].
pub fn parse_origin(raw: &str) -> Origin {
    if let Some(captures) = nested_pattern().captures(raw) {
        let mut segments = captures[1].trim().split(" at ");
        let invocation = segments.next().unwrap_or_default().trim().to_string();
        let name = segments
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != ANONYMOUS)
            .map(str::to_string);
        return Origin::Nested {
            invocation,
            name,
            origin: Box::new(parse_origin(&captures[2])),
        };
    }

    if let Some(captures) = located_pattern().captures(raw) {
        if let (Ok(line), Ok(column)) = (captures[2].parse::<u32>(), captures[3].parse::<u32>()) {
            return Origin::Located(Location {
                filename: captures[1].to_string(),
                line,
                column,
                pkg: None,
            });
        }
    }

    Origin::Bare {
        name: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_mut_reaches_innermost_location() {
        let mut origin = parse_origin("eval at a (eval at b (/srv/x.js:1:2))");
        let location = origin.location_mut().expect("innermost location");
        location.line = 9;
        assert!(matches!(origin.innermost(), Origin::Located(Location { line: 9, .. })));
        assert_eq!(origin.depth(), 2);
    }

    #[test]
    fn bare_origin_has_no_location() {
        let mut origin = parse_origin("native");
        assert!(origin.location_mut().is_none());
        assert_eq!(origin.depth(), 0);
    }
}

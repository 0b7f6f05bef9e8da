//! Raw call-site records supplied by the host environment.

use serde::{Deserialize, Serialize};

/// One raw stack frame as captured by the host runtime.
///
/// The accessors mirror what a JavaScript-style engine exposes per frame.
pub trait CallSite {
    fn is_toplevel(&self) -> bool;
    fn is_eval(&self) -> bool;
    fn is_native(&self) -> bool;
    fn is_constructor(&self) -> bool;
    fn type_name(&self) -> Option<&str>;
    fn function_name(&self) -> Option<&str>;
    fn method_name(&self) -> Option<&str>;
    fn file_name(&self) -> Option<&str>;
    fn line_number(&self) -> Option<u32>;
    fn column_number(&self) -> Option<u32>;
    fn eval_origin(&self) -> Option<&str>;
}

/// Owned call-site record, as carried by an error instance or read from a
/// capture document (camelCase keys).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCallSite {
    pub is_toplevel: bool,
    pub is_eval: bool,
    pub is_native: bool,
    pub is_constructor: bool,
    pub type_name: Option<String>,
    pub function_name: Option<String>,
    pub method_name: Option<String>,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
    pub eval_origin: Option<String>,
}

impl CallSite for RawCallSite {
    fn is_toplevel(&self) -> bool {
        self.is_toplevel
    }

    fn is_eval(&self) -> bool {
        self.is_eval
    }

    fn is_native(&self) -> bool {
        self.is_native
    }

    fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn line_number(&self) -> Option<u32> {
        self.line_number
    }

    fn column_number(&self) -> Option<u32> {
        self.column_number
    }

    fn eval_origin(&self) -> Option<&str> {
        self.eval_origin.as_deref()
    }
}

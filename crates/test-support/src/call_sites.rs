//! Call-site record builders.

use faultline_core::RawCallSite;

/// Fluent builder over [`RawCallSite`].
#[derive(Debug, Clone, Default)]
pub struct CallSiteFixture {
    call_site: RawCallSite,
}

impl CallSiteFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain function frame at `file:line:column`.
    pub fn function(name: &str, file: &str, line: u32, column: u32) -> Self {
        Self::new().function_name(name).file(file).at(line, column)
    }

    pub fn toplevel(mut self) -> Self {
        self.call_site.is_toplevel = true;
        self
    }

    pub fn eval(mut self) -> Self {
        self.call_site.is_eval = true;
        self
    }

    pub fn native(mut self) -> Self {
        self.call_site.is_native = true;
        self
    }

    pub fn constructor(mut self) -> Self {
        self.call_site.is_constructor = true;
        self
    }

    pub fn type_name(mut self, name: &str) -> Self {
        self.call_site.type_name = Some(name.to_string());
        self
    }

    pub fn function_name(mut self, name: &str) -> Self {
        self.call_site.function_name = Some(name.to_string());
        self
    }

    pub fn method_name(mut self, name: &str) -> Self {
        self.call_site.method_name = Some(name.to_string());
        self
    }

    /// Sets the file name and, as engines do for non-eval code, an eval
    /// origin equal to it.
    pub fn file(mut self, file: &str) -> Self {
        self.call_site.file_name = Some(file.to_string());
        self.call_site.eval_origin = Some(file.to_string());
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.call_site.line_number = Some(line);
        self.call_site.column_number = Some(column);
        self
    }

    pub fn eval_origin(mut self, origin: &str) -> Self {
        self.call_site.eval_origin = Some(origin.to_string());
        self
    }

    pub fn build(self) -> RawCallSite {
        self.call_site
    }
}

use nu_ansi_term::{Color, Style};

/// Report colors. A disabled palette returns text untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn name(&self, text: &str) -> String {
        self.paint(Color::Cyan.normal(), text)
    }

    pub fn message(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    pub fn frame_name(&self, text: &str) -> String {
        self.paint(Color::Yellow.normal(), text)
    }

    /// Data blocks, frame locations and truncation notes.
    pub fn muted(&self, text: &str) -> String {
        self.paint(Color::DarkGray.normal(), text)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled && !text.is_empty() {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

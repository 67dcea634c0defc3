//! Semantic color palette for terminal output.

use owo_colors::{OwoColorize, Style};

/// Granted capabilities, success messages (green bold).
pub fn success_style() -> Style {
    Style::new().green().bold()
}

/// Denials and errors (red bold).
pub fn error_style() -> Style {
    Style::new().red().bold()
}

pub fn warning_style() -> Style {
    Style::new().yellow()
}

pub fn info_style() -> Style {
    Style::new().cyan()
}

pub fn muted_style() -> Style {
    Style::new().dimmed()
}

pub fn header_style() -> Style {
    Style::new().bold()
}

/// Identifiers: permission names, user ids, paths (blue).
pub fn code_style() -> Style {
    Style::new().blue()
}

/// Trait extension to apply semantic styles.
///
/// Every method returns plain text when [`super::plain`] is set.
pub trait SemanticStyle {
    fn success(&self) -> String;
    fn error(&self) -> String;
    fn warning(&self) -> String;
    fn info(&self) -> String;
    fn muted(&self) -> String;
    fn header(&self) -> String;
    fn code(&self) -> String;
}

fn paint<T: std::fmt::Display + ?Sized>(value: &T, style: Style) -> String {
    if super::plain() {
        value.to_string()
    } else {
        value.style(style).to_string()
    }
}

impl<T: std::fmt::Display + ?Sized> SemanticStyle for T {
    fn success(&self) -> String {
        paint(self, success_style())
    }

    fn error(&self) -> String {
        paint(self, error_style())
    }

    fn warning(&self) -> String {
        paint(self, warning_style())
    }

    fn info(&self) -> String {
        paint(self, info_style())
    }

    fn muted(&self) -> String {
        paint(self, muted_style())
    }

    fn header(&self) -> String {
        paint(self, header_style())
    }

    fn code(&self) -> String {
        paint(self, code_style())
    }
}

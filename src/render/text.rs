//! Human-readable output.

use std::fmt::Write as _;
use std::io::Write;

use colored::Colorize;

use super::{Fatal, Output, Sink};
use crate::core::models::Star;
use crate::error::{ExitCode, Result};

/// Plain-text output, optionally colored.
///
/// A record renders as `full_name (url)` followed by indented description
/// and metadata lines.
pub struct TextOutput {
    info: Sink,
    error: Sink,
    color: bool,
}

impl TextOutput {
    /// Text output on stdout and stderr.
    #[must_use]
    pub fn stdio(color: bool) -> Self {
        Self {
            info: Sink::stdout(),
            error: Sink::stderr(),
            color,
        }
    }

    /// Text output on custom writers.
    #[must_use]
    pub fn with_writers(
        info: Box<dyn Write + Send>,
        error: Box<dyn Write + Send>,
        color: bool,
    ) -> Self {
        Self {
            info: Sink::new("info", info),
            error: Sink::new("error", error),
            color,
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Output for TextOutput {
    fn name(&self) -> &'static str {
        "text"
    }

    fn info(&self, message: &str) {
        self.info.line(message);
    }

    fn error(&self, message: &str) {
        let label = self.paint("error:", |s| s.red().bold());
        self.error.line(&format!("{label} {message}"));
    }

    fn fatal(&self, message: &str) -> Fatal {
        self.info.flush();
        let label = self.paint("fatal:", |s| s.red().bold());
        self.error.line(&format!("{label} {message}"));
        self.error.flush();
        Fatal::new(ExitCode::GeneralError)
    }

    fn format_star(&self, star: &Star) -> Result<String> {
        let mut out = format!(
            "{} ({})",
            self.paint(star.full_name(), |s| s.bold()),
            self.paint(star.url(), |s| s.cyan())
        );

        if let Some(description) = star.description() {
            let _ = write!(out, "\n    {description}");
        }

        let mut meta = Vec::new();
        if let Some(language) = star.language() {
            meta.push(language.to_string());
        }
        if let Some(count) = star.stargazers() {
            meta.push(format!("{count} stars"));
        }
        if !star.topics().is_empty() {
            meta.push(star.topics().join(", "));
        }
        if let Some(starred_at) = star.starred_at() {
            meta.push(format!("starred {}", starred_at.format("%Y-%m-%d")));
        }
        if !meta.is_empty() {
            let line = meta.join(" | ");
            let _ = write!(out, "\n    {}", self.paint(&line, |s| s.dimmed()));
        }

        Ok(out)
    }
}

//! Output backends and their registry.
//!
//! An [`Output`] turns stream items into user-visible text. Records go to the
//! info sink (stdout), inline errors and fatal messages to the error sink
//! (stderr). Write failures are logged and never interrupt a fetch.

pub mod error;
pub mod json;
pub mod text;

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::core::models::Star;
use crate::core::registry::canonical_key;
use crate::error::{ExitCode, Result, StarfetchError};

/// Name of the fallback output.
pub const DEFAULT_OUTPUT: &str = "text";

/// Signal returned by [`Output::fatal`]: the process should end with
/// `exit_code`. Outputs never exit on their own.
#[must_use = "a fatal message means the command must stop"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fatal {
    pub exit_code: ExitCode,
}

impl Fatal {
    pub const fn new(exit_code: ExitCode) -> Self {
        Self { exit_code }
    }
}

/// One output backend.
pub trait Output: Send + Sync {
    /// Canonical registry name, e.g. `"text"`.
    fn name(&self) -> &'static str;

    /// Write one informational line.
    fn info(&self, message: &str);

    /// Write one inline error.
    fn error(&self, message: &str);

    /// Write a terminal message and flush. Returns a general-error
    /// [`Fatal`] signal.
    fn fatal(&self, message: &str) -> Fatal;

    /// Render an aborting error with its code and fix suggestions.
    fn fatal_error(&self, err: &StarfetchError) -> Fatal {
        let _ = self.fatal(&error::render_error_text(err));
        Fatal::new(err.exit_code())
    }

    /// Render one record for [`Output::info`].
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    fn format_star(&self, star: &Star) -> Result<String>;
}

/// A locked writer that logs and swallows I/O failures.
pub(crate) struct Sink {
    label: &'static str,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Sink {
    pub(crate) fn new(label: &'static str, writer: Box<dyn Write + Send>) -> Self {
        Self {
            label,
            writer: Mutex::new(writer),
        }
    }

    pub(crate) fn stdout() -> Self {
        Self::new("stdout", Box::new(std::io::stdout()))
    }

    pub(crate) fn stderr() -> Self {
        Self::new("stderr", Box::new(std::io::stderr()))
    }

    /// Write `line` plus a newline.
    pub(crate) fn line(&self, line: &str) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{line}") {
            tracing::warn!(sink = self.label, error = %e, "Output write failed");
        }
    }

    pub(crate) fn flush(&self) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writer.flush() {
            tracing::warn!(sink = self.label, error = %e, "Output flush failed");
        }
    }
}

// =============================================================================
// Output Registry
// =============================================================================

/// Maps format names to outputs, falling back to `"text"`.
#[derive(Clone)]
pub struct OutputRegistry {
    outputs: HashMap<String, Arc<dyn Output>>,
}

impl OutputRegistry {
    /// A registry holding a stdout/stderr text output under `"text"`.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            outputs: HashMap::new(),
        };
        registry.register(Arc::new(text::TextOutput::stdio(false)));
        registry
    }

    /// Register an output under its canonical name, replacing any earlier one.
    pub fn register(&mut self, output: Arc<dyn Output>) {
        let key = canonical_key(output.name());
        if self.outputs.insert(key.clone(), output).is_some() {
            tracing::debug!(output = %key, "Replacing registered output");
        }
    }

    /// The output registered under `name`, or the text output.
    #[must_use]
    pub fn for_name(&self, name: &str) -> Arc<dyn Output> {
        let key = canonical_key(name);
        if let Some(output) = self.outputs.get(&key) {
            return Arc::clone(output);
        }

        tracing::debug!(requested = name, "Unknown output, using text");
        self.outputs
            .get(DEFAULT_OUTPUT)
            .cloned()
            .unwrap_or_else(|| Arc::new(text::TextOutput::stdio(false)))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.outputs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for OutputRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutputRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputRegistry")
            .field("outputs", &self.names())
            .finish()
    }
}

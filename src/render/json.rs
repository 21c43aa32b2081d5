//! JSON output: one object per record on stdout, one object per error on
//! stderr.

use std::io::Write;

use serde_json::json;

use super::error::render_error_json;
use super::{Fatal, Output, Sink};
use crate::core::models::Star;
use crate::error::{ExitCode, Result, StarfetchError};

pub struct JsonOutput {
    info: Sink,
    error: Sink,
    pretty: bool,
}

impl JsonOutput {
    #[must_use]
    pub fn stdio(pretty: bool) -> Self {
        Self {
            info: Sink::stdout(),
            error: Sink::stderr(),
            pretty,
        }
    }

    #[must_use]
    pub fn with_writers(
        info: Box<dyn Write + Send>,
        error: Box<dyn Write + Send>,
        pretty: bool,
    ) -> Self {
        Self {
            info: Sink::new("info", info),
            error: Sink::new("error", error),
            pretty,
        }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }

    fn message_line(&self, level: &str, message: &str) -> String {
        self.to_json(&json!({ "level": level, "message": message }))
            .unwrap_or_else(|_| message.to_string())
    }
}

impl Output for JsonOutput {
    fn name(&self) -> &'static str {
        "json"
    }

    fn info(&self, message: &str) {
        self.info.line(message);
    }

    fn error(&self, message: &str) {
        self.error.line(&self.message_line("error", message));
    }

    fn fatal(&self, message: &str) -> Fatal {
        self.info.flush();
        self.error.line(&self.message_line("fatal", message));
        self.error.flush();
        Fatal::new(ExitCode::GeneralError)
    }

    fn fatal_error(&self, err: &StarfetchError) -> Fatal {
        self.info.flush();
        self.error.line(&render_error_json(err, self.pretty));
        self.error.flush();
        Fatal::new(err.exit_code())
    }

    fn format_star(&self, star: &Star) -> Result<String> {
        self.to_json(star)
    }
}

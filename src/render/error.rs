//! Rendering of aborting errors.
//!
//! Text form: the message with its code, then the first suggestion's
//! commands and context. JSON form: one object for machine consumption.

use serde::Serialize;

use crate::error::StarfetchError;

/// Render `error` as plain multi-line text.
#[must_use]
pub fn render_error_text(error: &StarfetchError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines = vec![format!("{error} [{}]", error.error_code())];

    if let Some(suggestion) = suggestions.first() {
        let commands: Vec<&String> = suggestion
            .commands
            .iter()
            .filter(|cmd| !cmd.starts_with('#'))
            .collect();
        if !commands.is_empty() {
            lines.push(String::new());
            lines.push("How to fix:".to_string());
            for (i, cmd) in commands.iter().enumerate() {
                let prefix = if i == 0 { "  " } else { "  or " };
                lines.push(format!("{prefix}{cmd}"));
            }
        }
        if !suggestion.context.is_empty() {
            lines.push(String::new());
            lines.push(suggestion.context.clone());
        }
        if let Some(prevention) = &suggestion.prevention {
            lines.push(format!("Tip: {prevention}"));
        }
        if let Some(url) = &suggestion.doc_url {
            lines.push(format!("Docs: {url}"));
        }
    }

    lines.join("\n")
}

/// Render `error` as a JSON object.
#[must_use]
pub fn render_error_json(error: &StarfetchError, pretty: bool) -> String {
    let json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    rendered.unwrap_or_else(|_| format!("{error} [{}]", error.error_code()))
}

/// JSON representation of an error.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorJson {
    level: &'static str,
    error_code: &'static str,
    category: String,
    message: String,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
    suggestions: Vec<SuggestionJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_url: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &StarfetchError) -> Self {
        Self {
            level: "fatal",
            error_code: error.error_code(),
            category: error.category().to_string(),
            message: error.to_string(),
            is_retryable: error.is_retryable(),
            service: error.service().map(String::from),
            retry_after_seconds: error.retry_after().map(|d| d.as_secs()),
            suggestions: error
                .fix_suggestions()
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                    doc_url: s.doc_url,
                })
                .collect(),
        }
    }
}

//! Fix suggestion database for starfetch errors.
//!
//! Provides actionable fix suggestions mapped to specific error types,
//! including commands, context explanations, and prevention tips.

use std::time::Duration;

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Fix commands in order of preference, copy-paste ready.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,

    /// Link to documentation for more information.
    pub doc_url: Option<String>,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
            doc_url: None,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }

    /// Builder: adds documentation URL.
    #[must_use]
    pub fn with_doc_url(mut self, url: impl Into<String>) -> Self {
        self.doc_url = Some(url.into());
        self
    }
}

/// Where to create a personal access token for a service.
#[must_use]
pub fn token_settings_url(service: &str) -> Option<&'static str> {
    match service.to_lowercase().as_str() {
        "github" => Some("https://github.com/settings/tokens"),
        "gitlab" => Some("https://gitlab.com/-/user_settings/personal_access_tokens"),
        _ => None,
    }
}

fn with_token_docs(suggestion: FixSuggestion, service: &str) -> FixSuggestion {
    match token_settings_url(service) {
        Some(url) => suggestion.with_doc_url(url),
        None => suggestion,
    }
}

// =============================================================================
// Suggestion Generators
// =============================================================================

/// Suggestions for an aborted or empty login prompt.
#[must_use]
pub fn credential_suggestions(service: &str, reason: &str) -> Vec<FixSuggestion> {
    vec![with_token_docs(
        FixSuggestion::new(
            vec![format!("starfetch --service {service} login")],
            format!("Logging in to {service} did not complete: {reason}. The token is required."),
        ),
        service,
    )]
}

/// Suggestions when no token could be found anywhere.
#[must_use]
pub fn credential_missing_suggestions(service: &str) -> Vec<FixSuggestion> {
    let env_var = format!("STARFETCH_{}_TOKEN", service.to_uppercase());
    vec![with_token_docs(
        FixSuggestion::new(
            vec![
                format!("starfetch --service {service} login"),
                format!("export {env_var}=<TOKEN>"),
                format!("starfetch --service {service} stars --token <TOKEN>"),
            ],
            format!(
                "starfetch needs a personal access token for {service}. None was passed \
                 with --token, set in {env_var}, or stored in the system keyring."
            ),
        ),
        service,
    )]
}

/// Suggestions when the service answered 401.
#[must_use]
pub fn credential_rejected_suggestions(service: &str) -> Vec<FixSuggestion> {
    vec![with_token_docs(
        FixSuggestion::new(
            vec![
                format!("starfetch --service {service} logout"),
                format!("starfetch --service {service} login"),
            ],
            format!(
                "{service} refused the token. It may have expired, been revoked, or lack \
                 the scope needed to read starred repositories."
            ),
        )
        .with_prevention("Create tokens with an expiry you will notice, and read-only scopes."),
        service,
    )]
}

/// Suggestions for timeouts.
#[must_use]
pub fn timeout_suggestions(seconds: u64) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("STARFETCH_TIMEOUT={} starfetch stars", seconds * 2)],
            format!("The service did not respond within {seconds}s."),
        )
        .with_prevention("Raise `timeout_seconds` in the config file if this happens often."),
    ]
}

/// Suggestions for a config file that failed to parse.
#[must_use]
pub fn config_parse_suggestions(path: &str, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![format!("$EDITOR {path}")],
        format!("The config file has a syntax error. The TOML parser reported: {message}"),
    )]
}

/// Suggestions for a service name nobody registered.
#[must_use]
pub fn unknown_service_suggestions(name: &str, known: &[String]) -> Vec<FixSuggestion> {
    let commands = known
        .iter()
        .map(|service| format!("starfetch --service {service} stars"))
        .chain(std::iter::once("starfetch services".to_string()))
        .collect();

    vec![FixSuggestion::new(
        commands,
        format!("There is no service called '{name}'."),
    )]
}

/// Suggestions for rate limit errors.
#[must_use]
pub fn rate_limited_suggestions(service: &str, retry_after: Option<Duration>) -> Vec<FixSuggestion> {
    let wait_cmd = retry_after.map_or_else(
        || "# Wait before retrying".to_string(),
        |d| format!("sleep {} && starfetch --service {service} stars", d.as_secs()),
    );

    let wait_info = retry_after.map_or_else(
        || "Wait before retrying.".to_string(),
        |d| format!("Try again in {} seconds.", d.as_secs()),
    );

    vec![
        FixSuggestion::new(
            vec![wait_cmd],
            format!("You have been rate limited by {service}. {wait_info}"),
        )
        .with_prevention("Authenticated requests get a much higher rate limit than anonymous ones."),
    ]
}

/// Suggestions for non-success API responses.
#[must_use]
pub fn api_error_suggestions(service: &str, status: u16) -> Vec<FixSuggestion> {
    let context = match status {
        403 => format!("{service} denied access (HTTP 403). The token may lack the required scope."),
        404 => format!("{service} returned 404. Check the user name."),
        s if s >= 500 => {
            format!("{service} had a server error (HTTP {s}). This is usually transient.")
        }
        s => format!("{service} returned HTTP {s}."),
    };

    vec![FixSuggestion::new(
        vec![format!("starfetch -v --service {service} stars")],
        context,
    )]
}

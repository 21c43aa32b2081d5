//! Error types for starfetch.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five main categories:
//! - **Authentication**: Missing, rejected or aborted credentials
//! - **Network**: Connection and timeout issues
//! - **Configuration**: Config file problems and unknown service names
//! - **Service**: Page fetches, rate limits, API errors and record translation
//! - **Internal**: Unexpected errors, bugs, or unclassified issues
//!
//! Each error has a stable error code (e.g., `STAR-A001`) for programmatic handling.
//!
//! ## Inline vs. aborting errors
//!
//! Page and record errors travel through the star stream as
//! [`crate::core::models::StarResult::Error`] and are rendered inline.
//! Credential and unknown-service errors abort a command before any
//! streaming starts.

pub mod suggestions;

use std::time::Duration;
use thiserror::Error;

pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential problems (missing, rejected, prompt aborted).
    Authentication,
    /// Network issues (timeout, connection refused).
    Network,
    /// Configuration issues (parse errors, invalid values, unknown names).
    Configuration,
    /// Hosting-service issues (rate limits, API errors, bad records).
    Service,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Service => "Service error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Configuration => "C",
            Self::Service => "S",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure, or some pages/records failed
    GeneralError = 1,
    /// No usable credential
    CredentialError = 2,
    /// Bad configuration or unknown service
    ConfigError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Main error type for starfetch operations.
#[derive(Error, Debug)]
pub enum StarfetchError {
    // ==========================================================================
    // Authentication errors
    // ==========================================================================
    /// Interactive login failed or was cancelled.
    #[error("login to {service} failed: {reason}")]
    Credential { service: String, reason: String },

    /// No token was given on the command line, in the environment, or in the keyring.
    #[error("no token available for {service}")]
    CredentialMissing { service: String },

    /// The service refused the token (HTTP 401).
    #[error("{service} rejected the token")]
    CredentialRejected { service: String },

    /// The system keyring could not be written.
    #[error("credential store error: {0}")]
    CredentialStore(String),

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request timed out.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Generic network error.
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No backend is registered under the requested service name.
    #[error("unknown service '{name}' (known services: {})", known.join(", "))]
    UnknownService { name: String, known: Vec<String> },

    // ==========================================================================
    // Service errors
    // ==========================================================================
    /// One page request failed. Reported inline; later pages still run.
    #[error("failed to fetch page {page} from {service}: {source}")]
    PageFetch {
        service: String,
        page: u32,
        #[source]
        source: Box<StarfetchError>,
    },

    /// A native API item could not be turned into a star.
    #[error("could not read a {service} record: {reason}")]
    RecordTranslation { service: String, reason: String },

    /// Rate limited by the service.
    #[error("rate limited by {service}: {message}")]
    RateLimited {
        service: String,
        retry_after: Option<Duration>,
        message: String,
    },

    /// The service API returned a non-success status.
    #[error("{service} API error (HTTP {status}): {message}")]
    Api {
        service: String,
        status: u16,
        message: String,
    },

    /// Failed to parse a service response.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// Some stream items were errors.
    #[error("partial failure: {failed} error(s) while fetching stars")]
    PartialFailure { failed: usize },

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StarfetchError {
    /// Wrap a classified request failure as the inline error for `page`.
    #[must_use]
    pub fn page_fetch(service: &str, page: u32, source: Self) -> Self {
        Self::PageFetch {
            service: service.to_string(),
            page,
            source: Box::new(source),
        }
    }

    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Credential { .. }
            | Self::CredentialMissing { .. }
            | Self::CredentialRejected { .. }
            | Self::CredentialStore(_) => ExitCode::CredentialError,

            Self::Config(_) | Self::ConfigParse { .. } | Self::UnknownService { .. } => {
                ExitCode::ConfigError
            }

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_)
            | Self::PageFetch { .. }
            | Self::RecordTranslation { .. }
            | Self::RateLimited { .. }
            | Self::Api { .. }
            | Self::ParseResponse(_)
            | Self::PartialFailure { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Credential { .. }
            | Self::CredentialMissing { .. }
            | Self::CredentialRejected { .. }
            | Self::CredentialStore(_) => ErrorCategory::Authentication,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::Config(_) | Self::ConfigParse { .. } | Self::UnknownService { .. } => {
                ErrorCategory::Configuration
            }

            // A failed page is classified by what actually went wrong.
            Self::PageFetch { source, .. } => source.category(),

            Self::RecordTranslation { .. }
            | Self::RateLimited { .. }
            | Self::Api { .. }
            | Self::ParseResponse(_)
            | Self::PartialFailure { .. } => ErrorCategory::Service,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `STAR-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Credential { .. } => "STAR-A001",
            Self::CredentialMissing { .. } => "STAR-A002",
            Self::CredentialRejected { .. } => "STAR-A003",
            Self::CredentialStore(_) => "STAR-A004",

            Self::Timeout(_) => "STAR-N001",
            Self::Network(_) => "STAR-N099",

            Self::ConfigParse { .. } => "STAR-C001",
            Self::Config(_) => "STAR-C002",
            Self::UnknownService { .. } => "STAR-C010",

            Self::PageFetch { .. } => "STAR-S001",
            Self::RecordTranslation { .. } => "STAR-S002",
            Self::RateLimited { .. } => "STAR-S003",
            Self::Api { .. } => "STAR-S004",
            Self::ParseResponse(_) => "STAR-S020",
            Self::PartialFailure { .. } => "STAR-S030",

            Self::Io(_) => "STAR-X001",
            Self::Json(_) => "STAR-X002",
            Self::Other(_) => "STAR-X099",
        }
    }

    /// Returns whether retrying the same request later could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::PageFetch { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns the retry-after duration if this error specifies one.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            Self::PageFetch { source, .. } => source.retry_after(),
            _ => None,
        }
    }

    /// Returns the service name if this error is service-specific.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Credential { service, .. }
            | Self::CredentialMissing { service }
            | Self::CredentialRejected { service }
            | Self::PageFetch { service, .. }
            | Self::RecordTranslation { service, .. }
            | Self::RateLimited { service, .. }
            | Self::Api { service, .. } => Some(service),
            Self::UnknownService { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns actionable fix suggestions for this error.
    ///
    /// # Example
    ///
    /// ```
    /// use starfetch::error::StarfetchError;
    ///
    /// let err = StarfetchError::CredentialMissing { service: "github".to_string() };
    /// let suggestions = err.fix_suggestions();
    /// assert!(suggestions[0].commands[0].contains("login"));
    /// ```
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::Credential { service, reason } => {
                suggestions::credential_suggestions(service, reason)
            }
            Self::CredentialMissing { service } => suggestions::credential_missing_suggestions(service),
            Self::CredentialRejected { service } => {
                suggestions::credential_rejected_suggestions(service)
            }
            Self::CredentialStore(msg) => vec![FixSuggestion::new(
                vec!["starfetch stars --token <TOKEN>".to_string()],
                format!("The system keyring is not usable: {msg}. Pass the token explicitly instead."),
            )],
            Self::Timeout(seconds) => suggestions::timeout_suggestions(*seconds),
            Self::Network(msg) => vec![FixSuggestion::new(
                vec!["# Check your internet connection or proxy settings".to_string()],
                format!("Network error: {msg}."),
            )],
            Self::ConfigParse { path, message } => suggestions::config_parse_suggestions(path, message),
            Self::Config(msg) => vec![FixSuggestion::new(
                vec!["# Review ~/.config/starfetch/config.toml".to_string()],
                format!("Configuration error: {msg}"),
            )],
            Self::UnknownService { name, known } => {
                suggestions::unknown_service_suggestions(name, known)
            }
            Self::PageFetch { source, .. } => source.fix_suggestions(),
            Self::RecordTranslation { service, .. } => vec![FixSuggestion::new(
                Vec::new(),
                format!("{service} returned a record starfetch could not read. The remaining stars are still listed."),
            )],
            Self::RateLimited {
                service,
                retry_after,
                ..
            } => suggestions::rate_limited_suggestions(service, *retry_after),
            Self::Api { service, status, .. } => suggestions::api_error_suggestions(service, *status),
            Self::ParseResponse(msg) => vec![FixSuggestion::new(
                Vec::new(),
                format!("Failed to parse service response: {msg}. The API may have changed."),
            )],
            Self::PartialFailure { failed } => vec![FixSuggestion::new(
                vec!["starfetch -v stars".to_string()],
                format!("{failed} item(s) failed; the errors are listed above."),
            )],
            Self::Io(err) => vec![FixSuggestion::new(
                vec!["# Check file permissions and disk space".to_string()],
                format!("I/O error: {err}."),
            )],
            Self::Json(err) => vec![FixSuggestion::new(
                Vec::new(),
                format!("JSON error: {err}. The data may be corrupted or in an unexpected format."),
            )],
            Self::Other(err) => vec![FixSuggestion::new(
                Vec::new(),
                format!("Unexpected error: {err}. Please report this issue."),
            )],
        }
    }
}

/// Result type alias for starfetch operations.
pub type Result<T> = std::result::Result<T, StarfetchError>;

// =============================================================================
// Tests
// =============================================================================

//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/starfetch/config.toml`
//! - macOS: `~/Library/Application Support/dev.starfetch.starfetch/config.toml`
//! - Windows: `%APPDATA%/starfetch/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `STARFETCH_SERVICE`: Default hosting service (e.g., "gitlab")
//! - `STARFETCH_OUTPUT`: Output format (text, json)
//! - `STARFETCH_TIMEOUT`: Request timeout in seconds
//! - `STARFETCH_NO_COLOR` or `NO_COLOR`: Disable colors
//! - `STARFETCH_PRETTY`: Pretty-print JSON output (1, true, yes)
//! - `STARFETCH_GITHUB_API_BASE`, `STARFETCH_GITLAB_API_BASE`: Self-hosted API roots
//! - `STARFETCH_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::{Cli, StarsArgs};
use crate::error::{Result, StarfetchError};

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_SERVICE: &str = "STARFETCH_SERVICE";
pub const ENV_OUTPUT: &str = "STARFETCH_OUTPUT";
pub const ENV_TIMEOUT: &str = "STARFETCH_TIMEOUT";
pub const ENV_NO_COLOR: &str = "STARFETCH_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
pub const ENV_PRETTY: &str = "STARFETCH_PRETTY";
pub const ENV_GITHUB_API_BASE: &str = "STARFETCH_GITHUB_API_BASE";
pub const ENV_GITLAB_API_BASE: &str = "STARFETCH_GITLAB_API_BASE";
pub const ENV_CONFIG: &str = "STARFETCH_CONFIG";

pub const DEFAULT_SERVICE: &str = "github";
pub const DEFAULT_OUTPUT: &str = "text";
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_GITLAB_API_BASE: &str = "https://gitlab.com";
pub const DEFAULT_PER_PAGE: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Hosting service name, as given (not yet looked up).
    pub service: String,
    /// Output format name, as given. Unknown names fall back to text later.
    pub output: String,
    pub timeout: Duration,
    pub per_page: u32,
    pub no_color: bool,
    pub pretty: bool,
    pub github_api_base: String,
    pub gitlab_api_base: String,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub service: ConfigSource,
    pub output: ConfigSource,
    pub timeout: ConfigSource,
    pub per_page: ConfigSource,
    pub no_color: ConfigSource,
    pub pretty: ConfigSource,
    pub github_api_base: ConfigSource,
    pub gitlab_api_base: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            per_page: DEFAULT_PER_PAGE,
            no_color: false,
            pretty: false,
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            gitlab_api_base: DEFAULT_GITLAB_API_BASE.to_string(),
            sources: ConfigSources::default(),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and
    /// the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid, or if a
    /// resolved value is out of range.
    pub fn resolve(cli: &Cli, stars: Option<&StarsArgs>) -> Result<Self> {
        Self::resolve_with(cli, stars, &Self::load_config()?)
    }

    /// Resolve against an already loaded config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or a resolved value is invalid.
    pub fn resolve_with(cli: &Cli, stars: Option<&StarsArgs>, config: &Config) -> Result<Self> {
        config.validate()?;

        let mut sources = ConfigSources::default();

        let service = pick(
            cli.service.clone(),
            env_string(ENV_SERVICE),
            config.general.service.clone(),
            DEFAULT_SERVICE.to_string(),
            &mut sources.service,
        );
        let output = pick(
            cli.output.clone(),
            env_string(ENV_OUTPUT),
            config.output.format.clone(),
            DEFAULT_OUTPUT.to_string(),
            &mut sources.output,
        );
        let env_timeout = env_string(ENV_TIMEOUT)
            .map(|v| {
                v.parse::<u64>().map_err(|_| {
                    StarfetchError::Config(format!(
                        "{ENV_TIMEOUT} must be a number of seconds, got \"{v}\""
                    ))
                })
            })
            .transpose()?;
        let timeout_seconds = pick(
            stars.and_then(|args| args.timeout),
            env_timeout,
            Some(config.general.timeout_seconds),
            DEFAULT_TIMEOUT_SECS,
            &mut sources.timeout,
        );
        let per_page = pick(
            stars.and_then(|args| args.per_page),
            None,
            Some(config.general.per_page),
            DEFAULT_PER_PAGE,
            &mut sources.per_page,
        );
        let no_color = pick(
            cli.no_color.then_some(true),
            (is_env_truthy(ENV_NO_COLOR) || std::env::var_os(ENV_NO_COLOR_STD).is_some())
                .then_some(true),
            (!config.output.color).then_some(true),
            false,
            &mut sources.no_color,
        );
        let pretty = pick(
            cli.pretty.then_some(true),
            is_env_truthy(ENV_PRETTY).then_some(true),
            config.output.pretty.then_some(true),
            false,
            &mut sources.pretty,
        );
        let github_api_base = pick(
            None,
            env_string(ENV_GITHUB_API_BASE),
            config.services.github.api_base.clone(),
            DEFAULT_GITHUB_API_BASE.to_string(),
            &mut sources.github_api_base,
        );
        let gitlab_api_base = pick(
            None,
            env_string(ENV_GITLAB_API_BASE),
            config.services.gitlab.api_base.clone(),
            DEFAULT_GITLAB_API_BASE.to_string(),
            &mut sources.gitlab_api_base,
        );

        validate_timeout(timeout_seconds)?;
        validate_per_page(per_page)?;
        validate_api_base("github", &github_api_base)?;
        validate_api_base("gitlab", &gitlab_api_base)?;

        let resolved = Self {
            service,
            output,
            timeout: Duration::from_secs(timeout_seconds),
            per_page,
            no_color,
            pretty,
            github_api_base,
            gitlab_api_base,
            sources,
        };
        tracing::debug!(
            service = %resolved.service,
            service_source = %resolved.sources.service,
            output = %resolved.output,
            output_source = %resolved.sources.output,
            timeout_secs = timeout_seconds,
            "Resolved configuration"
        );
        Ok(resolved)
    }

    /// Load config file, respecting the `STARFETCH_CONFIG` override.
    fn load_config() -> Result<Config> {
        match env_string(ENV_CONFIG) {
            Some(path) => Config::load_from(Path::new(&path)),
            None => Config::load(),
        }
    }
}

/// First present value by precedence, recording where it came from.
fn pick<T>(
    cli: Option<T>,
    env: Option<T>,
    file: Option<T>,
    default: T,
    source: &mut ConfigSource,
) -> T {
    let (value, from) = match (cli, env, file) {
        (Some(v), _, _) => (v, ConfigSource::Cli),
        (None, Some(v), _) => (v, ConfigSource::Env),
        (None, None, Some(v)) => (v, ConfigSource::ConfigFile),
        (None, None, None) => (default, ConfigSource::Default),
    };
    *source = from;
    value
}

fn env_string(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var: &str) -> bool {
    std::env::var(var)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 || seconds > 300 {
        return Err(StarfetchError::Config(
            "Timeout must be between 1 and 300 seconds".to_string(),
        ));
    }
    Ok(())
}

fn validate_per_page(per_page: u32) -> Result<()> {
    if per_page == 0 || per_page > 100 {
        return Err(StarfetchError::Config(
            "per_page must be between 1 and 100".to_string(),
        ));
    }
    Ok(())
}

fn validate_api_base(service: &str, api_base: &str) -> Result<()> {
    Url::parse(api_base).map_err(|e| {
        StarfetchError::Config(format!("Invalid api_base \"{api_base}\" for {service}: {e}"))
    })?;
    Ok(())
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub output: OutputConfig,
    pub services: ServicesConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default hosting service.
    pub service: Option<String>,
    /// Timeout for network requests in seconds.
    pub timeout_seconds: u64,
    /// Records requested per page.
    pub per_page: u32,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (text, json).
    pub format: Option<String>,
    pub color: bool,
    pub pretty: bool,
}

/// Per-service settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub github: ServiceSettings,
    pub gitlab: ServiceSettings,
}

/// Settings for one hosting service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// API root for self-hosted instances.
    pub api_base: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            service: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::ConfigParse`] if the file is not valid TOML
    /// for this schema.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StarfetchError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        AppPaths::new().config_file()
    }

    /// Validate configuration values.
    ///
    /// Output format names are not checked; unknown formats fall back to
    /// text at render time.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::Config`] for out-of-range numbers or
    /// unparsable API roots.
    pub fn validate(&self) -> Result<()> {
        validate_timeout(self.general.timeout_seconds)?;
        validate_per_page(self.general.per_page)?;
        if let Some(base) = &self.services.github.api_base {
            validate_api_base("github", base)?;
        }
        if let Some(base) = &self.services.gitlab.api_base {
            validate_api_base("gitlab", base)?;
        }
        Ok(())
    }
}

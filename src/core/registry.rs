//! Process-wide service and output registries.
//!
//! Both registries are built once by [`init`] before any command runs and
//! are read-only afterwards.

use std::sync::{Arc, OnceLock};

use super::http::build_client;
use super::service::ServiceRegistry;
use crate::error::Result;
use crate::render::OutputRegistry;
use crate::render::json::JsonOutput;
use crate::render::text::TextOutput;
use crate::services::github::GitHub;
use crate::services::gitlab::GitLab;
use crate::storage::ResolvedConfig;

static REGISTRIES: OnceLock<Registries> = OnceLock::new();

/// Registry key for `name`: lower-cased, without any `::` or `.` namespace
/// prefix.
#[must_use]
pub fn canonical_key(name: &str) -> String {
    let last = name.rsplit("::").next().unwrap_or(name);
    let last = last.rsplit('.').next().unwrap_or(last);
    last.trim().to_lowercase()
}

/// The service and output registries.
#[derive(Debug)]
pub struct Registries {
    pub services: ServiceRegistry,
    pub outputs: OutputRegistry,
}

impl Registries {
    /// Register every built-in service and output, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(config: &ResolvedConfig) -> Result<Self> {
        let client = build_client(config.timeout)?;

        let mut services = ServiceRegistry::new();
        services.register(Arc::new(GitHub::new(
            client.clone(),
            &config.github_api_base,
            config.per_page,
            config.timeout,
        )));
        services.register(Arc::new(GitLab::new(
            client,
            &config.gitlab_api_base,
            config.per_page,
            config.timeout,
        )));

        let mut outputs = OutputRegistry::new();
        outputs.register(Arc::new(TextOutput::stdio(!config.no_color)));
        outputs.register(Arc::new(JsonOutput::stdio(config.pretty)));

        tracing::debug!(
            services = ?services.names(),
            outputs = ?outputs.names(),
            "Registries built"
        );
        Ok(Self { services, outputs })
    }
}

/// Build and publish the process-wide registries. Later calls return the
/// registries from the first successful call.
///
/// # Errors
///
/// Returns an error if the registries cannot be built.
pub fn init(config: &ResolvedConfig) -> Result<&'static Registries> {
    if let Some(existing) = REGISTRIES.get() {
        return Ok(existing);
    }
    let built = Registries::build(config)?;
    Ok(REGISTRIES.get_or_init(|| built))
}

/// The published registries, if [`init`] has run.
#[must_use]
pub fn get() -> Option<&'static Registries> {
    REGISTRIES.get()
}

//! Configuration storage.

pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_CONFIG, ENV_GITHUB_API_BASE, ENV_GITLAB_API_BASE,
    ENV_NO_COLOR, ENV_NO_COLOR_STD, ENV_OUTPUT, ENV_PRETTY, ENV_SERVICE, ENV_TIMEOUT,
    ResolvedConfig,
};
pub use paths::AppPaths;

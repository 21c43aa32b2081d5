//! starfetch - stream starred repositories from GitHub and GitLab.
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use starfetch::cli::{self, Cli, Commands};
use starfetch::core::{logging, registry};
use starfetch::render::Output;
use starfetch::render::text::TextOutput;
use starfetch::storage::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = logging::effective_level(
        cli.log_level.as_deref().and_then(logging::LogLevel::from_arg),
        cli.verbose,
    );
    let log_format = if cli.json_output {
        logging::LogFormat::Json
    } else {
        logging::parse_log_format_from_env().unwrap_or_default()
    };
    logging::init(log_level, log_format, logging::parse_log_file_from_env());

    let stars_args = match &cli.command {
        Some(Commands::Stars(args)) => Some(args.clone()),
        _ => None,
    };

    // Nothing is registered yet, so early failures go through a plain text output.
    let config = match ResolvedConfig::resolve(&cli, stars_args.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(error = %e, "Configuration failed");
            return TextOutput::stdio(!cli.no_color).fatal_error(&e).exit_code.into();
        }
    };
    let registries = match registry::init(&config) {
        Ok(registries) => registries,
        Err(e) => {
            tracing::debug!(error = %e, "Startup failed");
            return TextOutput::stdio(!config.no_color)
                .fatal_error(&e)
                .exit_code
                .into();
        }
    };

    let output = registries.outputs.for_name(&config.output);
    match cli::run(cli.command, &config, registries, output.as_ref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, code = e.error_code(), "Command failed");
            output.fatal_error(&e).exit_code.into()
        }
    }
}

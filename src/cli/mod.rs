//! CLI argument parsing and command dispatch.

pub mod args;
pub mod login;
pub mod services;
pub mod stars;

pub use args::{Cli, Commands, StarsArgs};

use crate::core::credentials::KeyringTokenStore;
use crate::core::prompt::TerminalPrompter;
use crate::core::registry::Registries;
use crate::error::Result;
use crate::render::Output;
use crate::storage::ResolvedConfig;

/// Dispatch the parsed command. No command means `stars` for the
/// authenticated user.
///
/// # Errors
///
/// Returns whatever the command failed with; the caller renders it through
/// [`Output::fatal_error`].
pub async fn run(
    command: Option<Commands>,
    config: &ResolvedConfig,
    registries: &Registries,
    output: &dyn Output,
) -> Result<()> {
    let store = KeyringTokenStore;

    match command.unwrap_or_else(|| Commands::Stars(StarsArgs::default())) {
        Commands::Stars(args) => {
            stars::execute(&args, &config.service, registries, output, &store)
                .await
                .map(|_| ())
        }
        Commands::Login => login::login(
            &config.service,
            registries,
            output,
            &TerminalPrompter::new(),
            &store,
        ),
        Commands::Logout => login::logout(&config.service, registries, output, &store),
        Commands::Services => services::execute(registries, output, config.pretty),
    }
}

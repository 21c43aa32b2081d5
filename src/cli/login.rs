//! `login` and `logout` commands.

use crate::core::credentials::TokenStore;
use crate::core::prompt::Prompter;
use crate::core::registry::Registries;
use crate::error::Result;
use crate::render::Output;

/// Prompt for a token and store it.
///
/// # Errors
///
/// Returns an error for an unknown service, an aborted or empty prompt, or a
/// keyring failure.
pub fn login(
    service_name: &str,
    registries: &Registries,
    output: &dyn Output,
    prompter: &dyn Prompter,
    store: &dyn TokenStore,
) -> Result<()> {
    let service = registries.services.lookup(service_name)?;
    let token = service.login(prompter)?;
    store.save(service.name(), &token)?;

    tracing::info!(service = service.name(), "Token stored");
    output.info(&format!("Stored {} token.", service.display_name()));
    Ok(())
}

/// Forget the stored token.
///
/// # Errors
///
/// Returns an error for an unknown service or a keyring failure.
pub fn logout(
    service_name: &str,
    registries: &Registries,
    output: &dyn Output,
    store: &dyn TokenStore,
) -> Result<()> {
    let service = registries.services.lookup(service_name)?;
    store.delete(service.name())?;

    tracing::info!(service = service.name(), "Token removed");
    output.info(&format!("Removed {} token.", service.display_name()));
    Ok(())
}

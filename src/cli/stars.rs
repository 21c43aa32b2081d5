//! `stars` command implementation.

use crate::cli::args::StarsArgs;
use crate::core::credentials::{TokenStore, resolve_token};
use crate::core::pipeline::{self, FetchSummary};
use crate::core::registry::Registries;
use crate::error::{Result, StarfetchError};
use crate::render::Output;

/// Execute the stars command against the service named `service_name`.
///
/// Service lookup and token resolution happen before anything is streamed;
/// a failure there aborts the command. Inline errors do not abort, but turn
/// the final result into [`StarfetchError::PartialFailure`].
///
/// # Errors
///
/// Returns an error for an unknown service, a missing token, or when any
/// streamed item was an error.
pub async fn execute(
    args: &StarsArgs,
    service_name: &str,
    registries: &Registries,
    output: &dyn Output,
    store: &dyn TokenStore,
) -> Result<FetchSummary> {
    let service = registries.services.lookup(service_name)?;
    let token = resolve_token(service.name(), args.token.as_deref(), store)?;
    let user = args
        .user
        .as_deref()
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(str::to_string);

    let summary = pipeline::fetch_stars(service, output, token, user).await;

    if summary.is_clean() {
        Ok(summary)
    } else {
        Err(StarfetchError::PartialFailure {
            failed: summary.errors,
        })
    }
}

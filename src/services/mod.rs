//! Hosting-service backends.
//!
//! Each service has its own submodule implementing [`Service`].

pub mod github;
pub mod gitlab;

pub use crate::core::service::{Service, ServiceRegistry};
pub use github::GitHub;
pub use gitlab::GitLab;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::core::models::{Star, StarResult};
use crate::error::{Result, StarfetchError};

/// Append path `segments` to `api_base`, percent-encoding each one.
pub(crate) fn endpoint(api_base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| StarfetchError::Config(format!("invalid API base \"{api_base}\": {e}")))?;
    url.path_segments_mut()
        .map_err(|()| StarfetchError::Config(format!("API base \"{api_base}\" cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decode each raw item on its own, so one malformed record does not cost
/// the rest of the page.
pub(crate) fn translate_items<T, F>(
    service: &str,
    raw: Vec<serde_json::Value>,
    translate: F,
) -> Vec<StarResult>
where
    T: DeserializeOwned,
    F: Fn(T) -> Result<Star>,
{
    raw.into_iter()
        .map(|value| {
            StarResult::from(
                serde_json::from_value::<T>(value)
                    .map_err(|e| StarfetchError::RecordTranslation {
                        service: service.to_string(),
                        reason: e.to_string(),
                    })
                    .and_then(&translate),
            )
        })
        .collect()
}

//! HTTP client utilities.
//!
//! Provides the shared client builder and the response classification every
//! service backend uses to turn HTTP failures into [`StarfetchError`]s.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::pagination::numeric_header;
use crate::error::{Result, StarfetchError};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("starfetch/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| StarfetchError::Network(e.to_string()))
}

/// Send a request and decode a JSON body, keeping the response headers for
/// pagination.
///
/// # Errors
///
/// Returns a classified error on network failure, non-success status, or a
/// body that does not decode as `T`.
pub async fn send_json<T: DeserializeOwned>(
    service: &str,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<(T, HeaderMap)> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            StarfetchError::Timeout(timeout.as_secs())
        } else {
            StarfetchError::Network(e.to_string())
        }
    })?;

    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(service, status, &headers, &body));
    }

    let value = response
        .json()
        .await
        .map_err(|e| StarfetchError::ParseResponse(e.to_string()))?;

    Ok((value, headers))
}

/// Map a non-success response to the error it represents.
#[must_use]
pub fn classify_status(
    service: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> StarfetchError {
    let message = api_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });

    let quota_exhausted = numeric_header(headers, "x-ratelimit-remaining") == Some(0);

    match status {
        StatusCode::UNAUTHORIZED => StarfetchError::CredentialRejected {
            service: service.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => rate_limited(service, headers, message),
        StatusCode::FORBIDDEN if quota_exhausted => rate_limited(service, headers, message),
        _ => StarfetchError::Api {
            service: service.to_string(),
            status: status.as_u16(),
            message,
        },
    }
}

fn rate_limited(service: &str, headers: &HeaderMap, message: String) -> StarfetchError {
    StarfetchError::RateLimited {
        service: service.to_string(),
        retry_after: retry_after(headers),
        message,
    }
}

/// How long the service asked us to wait, from `Retry-After` (seconds) or
/// `X-RateLimit-Reset` (epoch seconds).
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    if let Some(seconds) = numeric_header(headers, RETRY_AFTER.as_str()) {
        return Some(Duration::from_secs(seconds));
    }

    let reset = numeric_header(headers, "x-ratelimit-reset")?;
    let now = u64::try_from(Utc::now().timestamp()).ok()?;
    Some(Duration::from_secs(reset.saturating_sub(now)))
}

/// Both GitHub and GitLab put a human-readable reason under `message`.
fn api_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn unauthorized_means_rejected_token() {
        let err = classify_status("github", StatusCode::UNAUTHORIZED, &HeaderMap::new(), "");
        assert!(matches!(err, StarfetchError::CredentialRejected { .. }));
    }

    #[test]
    fn forbidden_with_exhausted_quota_is_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("retry-after", HeaderValue::from_static("30"));

        let err = classify_status(
            "github",
            StatusCode::FORBIDDEN,
            &headers,
            r#"{"message":"API rate limit exceeded"}"#,
        );
        assert!(matches!(err, StarfetchError::RateLimited { .. }));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
        assert!(err.to_string().contains("API rate limit exceeded"));
    }

    #[test]
    fn plain_forbidden_is_api_error() {
        let err = classify_status("gitlab", StatusCode::FORBIDDEN, &HeaderMap::new(), "");
        match err {
            StarfetchError::Api { status, message, .. } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_message_reads_json_bodies() {
        assert_eq!(
            api_message(r#"{"message":"404 Not found"}"#).as_deref(),
            Some("404 Not found")
        );
        assert_eq!(api_message("<html>").as_deref(), None);
    }
}

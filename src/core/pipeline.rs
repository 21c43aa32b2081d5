//! Star fetch pipeline.
//!
//! Connects one service producer to one output consumer through a small
//! bounded channel, so records are rendered while later pages are still
//! being requested.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use super::models::StarResult;
use super::service::Service;
use crate::render::Output;

/// Capacity of the star stream between producer and consumer.
pub const STREAM_CAPACITY: usize = 8;

/// What one fetch forwarded to the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Records rendered through `info`.
    pub stars: usize,
    /// Errors rendered through `error`.
    pub errors: usize,
}

impl FetchSummary {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Stream every starred repository of `user` from `service` into `output`.
///
/// `user == None` lists the authenticated user's stars. Per-page and
/// per-record failures are rendered inline and counted; they never stop the
/// stream.
pub async fn fetch_stars(
    service: Arc<dyn Service>,
    output: &dyn Output,
    token: String,
    user: Option<String>,
) -> FetchSummary {
    let started = Instant::now();
    tracing::info!(service = service.name(), user = ?user, "Fetching stars");

    let (tx, mut rx) = mpsc::channel(STREAM_CAPACITY);
    let producer_service = Arc::clone(&service);
    let producer = tokio::spawn(async move {
        producer_service
            .fetch_stars(tx, &token, user.as_deref())
            .await;
    });

    let mut summary = FetchSummary::default();
    while let Some(item) = rx.recv().await {
        match item {
            StarResult::Star(star) => match output.format_star(&star) {
                Ok(line) => {
                    output.info(&line);
                    summary.stars += 1;
                }
                Err(e) => {
                    output.error(&e.to_string());
                    summary.errors += 1;
                }
            },
            StarResult::Error(e) => {
                output.error(&e.to_string());
                summary.errors += 1;
            }
        }
    }

    if let Err(e) = producer.await {
        tracing::error!(service = service.name(), error = %e, "Producer task failed");
        output.error(&format!("{} fetch aborted: {e}", service.display_name()));
        summary.errors += 1;
    }

    tracing::info!(
        service = service.name(),
        stars = summary.stars,
        errors = summary.errors,
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Fetch finished"
    );
    summary
}

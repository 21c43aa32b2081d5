//! Fetch pipeline and registries through the public API.
//!
//! Covers:
//! - Stream order across pages, with a failed page in the middle
//! - Output fallback and service lookup through the startup registries
//! - Structured logging around a fetch

mod common;

use std::sync::Arc;

use starfetch::core::pipeline::{FetchSummary, fetch_stars};
use starfetch::core::registry::{self, Registries};
use starfetch::core::service::Service;
use starfetch::error::StarfetchError;
use starfetch::render::OutputRegistry;
use starfetch::storage::ResolvedConfig;
use starfetch::test_utils::{RecordingOutput, ScriptedService, page_of};

use common::log_capture::TestLogCapture;
use common::logger::TestLogger;

fn three_pages_with_failure() -> ScriptedService {
    ScriptedService::named("github")
        .with_display("GitHub")
        .with_page(Ok(page_of("github", 1, 2, Some(3))))
        .with_page(Err(StarfetchError::Network("connection reset".into())))
        .with_page(Ok(page_of("github", 5, 2, None)))
}

#[tokio::test]
async fn failed_page_sits_between_its_neighbours() {
    let log = TestLogger::new("failed_page_sits_between_its_neighbours");
    log.phase("setup");
    let service = Arc::new(three_pages_with_failure());
    let output = RecordingOutput::new();

    log.phase("test");
    let summary = fetch_stars(
        Arc::clone(&service) as Arc<dyn Service>,
        &output,
        "token".into(),
        None,
    )
    .await;

    assert_eq!(summary, FetchSummary { stars: 4, errors: 1 });
    assert_eq!(service.requested_pages(), vec![1, 2, 3]);
    assert_eq!(
        output.events(),
        vec![
            "info: owner/repo-1".to_string(),
            "info: owner/repo-2".to_string(),
            "error: failed to fetch page 2 from github: network error: connection reset"
                .to_string(),
            "info: owner/repo-5".to_string(),
            "info: owner/repo-6".to_string(),
        ]
    );
    log.finish_ok();
}

#[tokio::test]
async fn error_free_pages_are_concatenated() {
    let service = Arc::new(
        ScriptedService::named("gitlab")
            .with_page(Ok(page_of("gitlab", 1, 3, Some(2))))
            .with_page(Ok(page_of("gitlab", 4, 3, Some(2)))),
    );
    let output = RecordingOutput::new();

    let summary = fetch_stars(service, &output, "token".into(), None).await;

    assert!(summary.is_clean());
    assert_eq!(
        output.infos(),
        (1..=6).map(|id| format!("owner/repo-{id}")).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn fetch_is_logged_with_service_field() {
    let capture = TestLogCapture::start();
    let service = Arc::new(three_pages_with_failure());
    let output = RecordingOutput::new();

    fetch_stars(service, &output, "token".into(), None).await;

    capture.assert_logged_at_level(tracing::Level::INFO, "Fetching stars");
    capture.assert_logged_at_level(tracing::Level::WARN, "Page fetch failed");
    capture.assert_logged_at_level(tracing::Level::INFO, "Fetch finished");
    capture.assert_field_logged("service", "github");
}

#[test]
fn json_falls_back_to_text_when_only_text_is_registered() {
    let outputs = OutputRegistry::new();
    assert_eq!(outputs.for_name("json").name(), "text");
    assert_eq!(outputs.for_name("").name(), "text");
}

#[test]
fn startup_registries_know_both_services() {
    let registries: &Registries = registry::init(&ResolvedConfig::default()).unwrap();

    assert_eq!(registries.services.lookup("GitHub").unwrap().name(), "github");
    assert_eq!(registries.services.lookup("gitlab").unwrap().name(), "gitlab");
    assert!(matches!(
        registries.services.lookup("bitbucket"),
        Err(StarfetchError::UnknownService { .. })
    ));
    assert_eq!(registries.outputs.for_name("JSON").name(), "json");
    assert!(std::ptr::eq(registries, registry::get().unwrap()));
}

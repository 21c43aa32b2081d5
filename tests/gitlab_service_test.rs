//! GitLab backend against a mock API.

mod common;

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starfetch::core::http::build_client;
use starfetch::core::models::StarResult;
use starfetch::error::StarfetchError;
use starfetch::services::GitLab;
use starfetch::test_utils::collect_stream;

use common::logger::TestLogger;

const TIMEOUT: Duration = Duration::from_secs(5);

fn gitlab(server: &MockServer) -> GitLab {
    GitLab::new(build_client(TIMEOUT).unwrap(), &server.uri(), 20, TIMEOUT)
}

fn project(id: u64, namespace: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "path_with_namespace": format!("{namespace}/{name}"),
        "namespace": { "path": namespace, "full_path": namespace },
        "web_url": format!("https://gitlab.com/{namespace}/{name}"),
        "star_count": 10
    })
}

fn ids(items: &[StarResult]) -> Vec<String> {
    items
        .iter()
        .filter_map(StarResult::star)
        .map(|star| star.id().to_string())
        .collect()
}

#[tokio::test]
async fn authenticated_user_lists_starred_projects() {
    let log = TestLogger::new("authenticated_user_lists_starred_projects");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("starred", "true"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "20"))
        .and(header("private-token", "test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-pages", "1")
                .set_body_json(json!([project(1, "gitlab-org", "gitlab")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let items = collect_stream(&gitlab(&server), None).await;

    assert_eq!(ids(&items), vec!["gitlab:1"]);
    let star = items[0].star().expect("a star");
    assert_eq!(star.full_name(), "gitlab-org/gitlab");
    assert_eq!(star.owner(), "gitlab-org");
    log.finish_ok();
}

#[tokio::test]
async fn named_user_uses_starred_projects_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/users/jdoe/starred_projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project(
            9, "group/sub", "tool"
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let items = collect_stream(&gitlab(&server), Some("jdoe")).await;
    let star = items[0].star().expect("a star");
    assert_eq!(star.owner(), "group/sub");
}

#[tokio::test]
async fn total_pages_header_drives_pagination() {
    let server = MockServer::start().await;

    for page in 1..=3u64 {
        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-total-pages", "3")
                    .set_body_json(json!([project(page, "ns", &format!("p{page}"))])),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let items = collect_stream(&gitlab(&server), None).await;
    assert_eq!(ids(&items), vec!["gitlab:1", "gitlab:2", "gitlab:3"]);
}

#[tokio::test]
async fn empty_first_page_ends_stream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-pages", "0")
                .set_body_json(json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let items = collect_stream(&gitlab(&server), None).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn legacy_tag_list_becomes_topics() {
    let server = MockServer::start().await;
    let mut legacy = project(4, "ns", "old");
    legacy["tag_list"] = json!(["legacy", "ruby"]);

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([legacy])))
        .mount(&server)
        .await;

    let items = collect_stream(&gitlab(&server), None).await;
    let star = items[0].star().expect("a star");
    assert_eq!(star.topics(), ["legacy".to_string(), "ruby".to_string()]);
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "5"))
        .mount(&server)
        .await;

    let items = collect_stream(&gitlab(&server), None).await;

    assert_eq!(items.len(), 1);
    match &items[0] {
        StarResult::Error(StarfetchError::PageFetch { service, page, source }) => {
            assert_eq!(service, "gitlab");
            assert_eq!(*page, 1);
            assert!(matches!(**source, StarfetchError::RateLimited { .. }));
            assert!(source.is_retryable());
        }
        other => panic!("expected page error, got {other:?}"),
    }
}

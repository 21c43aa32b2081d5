//! E2E tests for the starfetch binary.
//!
//! Covers:
//! - Streaming stars from a mock GitHub/GitLab API in text and JSON
//! - Inline page errors and the partial-failure exit code
//! - Unknown services, missing tokens, bad configuration
//! - The `services` listing and help output

mod common;

use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starfetch::test_utils::TestDir;

use common::logger::TestLogger;

/// Environment the binary must not inherit from the developer's shell.
const ISOLATED_VARS: &[&str] = &[
    "STARFETCH_SERVICE",
    "STARFETCH_OUTPUT",
    "STARFETCH_TIMEOUT",
    "STARFETCH_PRETTY",
    "STARFETCH_NO_COLOR",
    "STARFETCH_LOG",
    "STARFETCH_LOG_FILE",
    "STARFETCH_GITHUB_TOKEN",
    "STARFETCH_GITLAB_TOKEN",
    "STARFETCH_GITHUB_API_BASE",
    "STARFETCH_GITLAB_API_BASE",
    "RUST_LOG",
];

/// A command with a clean environment and a config path inside `dir`.
fn starfetch(dir: &TestDir) -> Command {
    let mut cmd = Command::from_std(StdCommand::new(env!("CARGO_BIN_EXE_starfetch")));
    for var in ISOLATED_VARS {
        cmd.env_remove(var);
    }
    cmd.env("STARFETCH_CONFIG", dir.path().join("config.toml"))
        .env("NO_COLOR", "1");
    cmd
}

fn repo(id: u64, name: &str) -> Value {
    json!({
        "starred_at": "2024-05-01T08:00:00Z",
        "repo": {
            "id": id,
            "name": name,
            "owner": { "login": "octocat" },
            "html_url": format!("https://github.com/octocat/{name}"),
            "language": "Rust",
            "stargazers_count": 3
        }
    })
}

async fn github_with_pages(pages: Vec<ResponseTemplate>) -> MockServer {
    let server = MockServer::start().await;
    for (index, response) in pages.into_iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/users/octocat/starred"))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(response)
            .mount(&server)
            .await;
    }
    server
}

fn link_last(server: &MockServer, last: u32) -> String {
    format!(
        "<{}/users/octocat/starred?page={last}>; rel=\"last\"",
        server.uri()
    )
}

// =============================================================================
// Streaming
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn streams_stars_as_text() {
    let log = TestLogger::new("streams_stars_as_text");
    log.phase("setup");
    let dir = TestDir::new();
    let server = github_with_pages(vec![
        ResponseTemplate::new(200).set_body_json(json!([repo(1, "alpha"), repo(2, "beta")])),
    ])
    .await;

    log.phase("test");
    starfetch(&dir)
        .env("STARFETCH_GITHUB_API_BASE", server.uri())
        .env("STARFETCH_GITHUB_TOKEN", "env-token")
        .args(["stars", "octocat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "octocat/alpha (https://github.com/octocat/alpha)",
        ))
        .stdout(predicate::str::contains("Rust | 3 stars | starred 2024-05-01"))
        .stdout(predicate::str::contains("octocat/beta"));
    log.finish_ok();
}

#[tokio::test(flavor = "multi_thread")]
async fn json_output_is_one_object_per_line() {
    let dir = TestDir::new();
    let server = github_with_pages(vec![
        ResponseTemplate::new(200).set_body_json(json!([repo(1, "alpha"), repo(2, "beta")])),
    ])
    .await;

    let assert = starfetch(&dir)
        .env("STARFETCH_GITHUB_API_BASE", server.uri())
        .env("STARFETCH_GITHUB_TOKEN", "env-token")
        .args(["-o", "json", "stars", "octocat"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let records: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "github:1");
    assert_eq!(records[1]["fullName"], "octocat/beta");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_page_is_inline_and_exit_is_nonzero() {
    let log = TestLogger::new("failed_page_is_inline_and_exit_is_nonzero");
    let dir = TestDir::new();
    let server = MockServer::start().await;
    let link = link_last(&server, 3);
    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link.as_str())
                .set_body_json(json!([repo(1, "first")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo(3, "third")])))
        .mount(&server)
        .await;

    starfetch(&dir)
        .env("STARFETCH_GITHUB_API_BASE", server.uri())
        .env("STARFETCH_GITHUB_TOKEN", "env-token")
        .args(["stars", "octocat"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("octocat/first"))
        .stdout(predicate::str::contains("octocat/third"))
        .stderr(predicate::str::contains("failed to fetch page 2 from github"))
        .stderr(predicate::str::contains("partial failure: 1 error(s)"));
    log.finish_ok();
}

#[tokio::test(flavor = "multi_thread")]
async fn gitlab_is_selected_by_flag() {
    let dir = TestDir::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/users/jdoe/starred_projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 11,
            "name": "runner",
            "path_with_namespace": "gitlab-org/runner",
            "web_url": "https://gitlab.com/gitlab-org/runner"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    starfetch(&dir)
        .env("STARFETCH_GITLAB_API_BASE", server.uri())
        .args(["--service", "GitLab", "stars", "jdoe", "--token", "flag-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitlab-org/runner"));
}

// =============================================================================
// Startup Failures
// =============================================================================

#[test]
fn unknown_service_exits_with_config_error() {
    let dir = TestDir::new();
    starfetch(&dir)
        .args(["--service", "bitbucket", "stars", "--token", "t"])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown service 'bitbucket'"))
        .stderr(predicate::str::contains("github, gitlab"));
}

#[test]
fn unknown_service_in_json_mode_is_structured() {
    let dir = TestDir::new();
    let assert = starfetch(&dir)
        .args(["-s", "bitbucket", "-o", "json", "stars", "--token", "t"])
        .assert()
        .code(3);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    let fatal: Value = serde_json::from_str(stderr.trim()).expect("JSON error");
    assert_eq!(fatal["level"], "fatal");
    assert_eq!(fatal["category"], "Configuration error");
}

#[test]
fn corrupt_config_file_exits_with_config_error() {
    let dir = TestDir::new();
    dir.create_file("config.toml", "[general\nservice = ");

    starfetch(&dir)
        .arg("services")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn out_of_range_per_page_is_rejected() {
    let dir = TestDir::new();
    starfetch(&dir)
        .args(["stars", "--per-page", "500", "--token", "t"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("per_page"));
}

// =============================================================================
// Listing and Help
// =============================================================================

#[test]
fn services_lists_backends_and_outputs() {
    let dir = TestDir::new();
    starfetch(&dir)
        .arg("services")
        .assert()
        .success()
        .stdout(predicate::str::contains("github"))
        .stdout(predicate::str::contains("GitLab"))
        .stdout(predicate::str::contains("json"));
}

#[test]
fn services_json_listing_parses() {
    let dir = TestDir::new();
    let assert = starfetch(&dir)
        .args(["services", "-o", "json"])
        .assert()
        .success();

    let listing: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("JSON listing");
    assert_eq!(listing["services"][0]["name"], "github");
    assert_eq!(listing["outputs"], json!(["json", "text"]));
}

#[test]
fn help_mentions_commands() {
    let dir = TestDir::new();
    starfetch(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stars"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("services"));
}

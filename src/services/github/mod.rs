//! GitHub backend.
//!
//! Lists stars through the REST API:
//! - `GET /user/starred` for the authenticated user
//! - `GET /users/{user}/starred` for anyone else
//!
//! The `star+json` media type wraps each repository with the time it was
//! starred. The last page number comes from the `Link` header.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::{endpoint, translate_items};
use crate::core::http::send_json;
use crate::core::models::Star;
use crate::core::pagination::{Page, last_page_from_link};
use crate::core::service::Service;
use crate::error::Result;

pub const NAME: &str = "github";

const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

pub struct GitHub {
    client: Client,
    api_base: String,
    per_page: u32,
    timeout: Duration,
}

impl GitHub {
    #[must_use]
    pub fn new(client: Client, api_base: &str, per_page: u32, timeout: Duration) -> Self {
        Self {
            client,
            api_base: api_base.to_string(),
            per_page,
            timeout,
        }
    }
}

#[async_trait]
impl Service for GitHub {
    fn name(&self) -> &'static str {
        NAME
    }

    fn display_name(&self) -> &'static str {
        "GitHub"
    }

    fn token_prompt(&self) -> &'static str {
        "GitHub personal access token"
    }

    async fn fetch_page(&self, token: &str, user: Option<&str>, page: u32) -> Result<Page> {
        let url = match user {
            Some(user) => endpoint(&self.api_base, &["users", user, "starred"])?,
            None => endpoint(&self.api_base, &["user", "starred"])?,
        };

        let request = self
            .client
            .get(url)
            .query(&[("page", page), ("per_page", self.per_page)])
            .bearer_auth(token)
            .header(ACCEPT, STAR_MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION);

        let (raw, headers): (Vec<serde_json::Value>, _) =
            send_json(NAME, request, self.timeout).await?;

        Ok(Page::new(
            translate_items(NAME, raw, translate),
            last_page_from_link(&headers),
        ))
    }
}

// =============================================================================
// Native Types
// =============================================================================

/// One item of the starred list. Without the `star+json` media type GitHub
/// sends the bare repository.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StarredEntry {
    Timestamped {
        starred_at: Option<DateTime<Utc>>,
        repo: Repository,
    },
    Bare(Repository),
}

#[derive(Debug, Deserialize)]
struct Repository {
    id: Option<u64>,
    name: Option<String>,
    full_name: Option<String>,
    owner: Option<Owner>,
    html_url: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
    language: Option<String>,
    stargazers_count: Option<u64>,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: Option<String>,
}

fn translate(entry: StarredEntry) -> Result<Star> {
    let (starred_at, repo) = match entry {
        StarredEntry::Timestamped { starred_at, repo } => (starred_at, repo),
        StarredEntry::Bare(repo) => (None, repo),
    };

    let remote_id = repo.id.map(|id| id.to_string()).unwrap_or_default();
    let mut builder = Star::builder(NAME, remote_id)
        .description(repo.description)
        .homepage(repo.homepage)
        .language(repo.language)
        .stargazers(repo.stargazers_count)
        .topics(repo.topics)
        .starred_at(starred_at);

    if let Some(name) = repo.name {
        builder = builder.name(name);
    }
    if let Some(login) = repo.owner.and_then(|owner| owner.login) {
        builder = builder.owner(login);
    }
    if let Some(full_name) = repo.full_name {
        builder = builder.full_name(full_name);
    }
    if let Some(url) = repo.html_url {
        builder = builder.url(url);
    }

    builder.build()
}

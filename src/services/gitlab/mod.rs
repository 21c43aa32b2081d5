//! GitLab backend.
//!
//! - `GET /api/v4/projects?starred=true` for the authenticated user
//! - `GET /api/v4/users/{user}/starred_projects` for anyone else
//!
//! GitLab reports the page count in `X-Total-Pages`; large result sets omit
//! it, in which case the `Link` header is used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{endpoint, translate_items};
use crate::core::http::send_json;
use crate::core::models::Star;
use crate::core::pagination::{Page, last_page_from_link, numeric_header};
use crate::core::service::Service;
use crate::error::Result;

pub const NAME: &str = "gitlab";

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const TOTAL_PAGES_HEADER: &str = "x-total-pages";

pub struct GitLab {
    client: Client,
    api_base: String,
    per_page: u32,
    timeout: Duration,
}

impl GitLab {
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
impl Service for GitLab {
    fn name(&self) -> &'static str {
        NAME
    }

    fn display_name(&self) -> &'static str {
        "GitLab"
    }

    fn token_prompt(&self) -> &'static str {
        "GitLab personal access token"
    }

    async fn fetch_page(&self, token: &str, user: Option<&str>, page: u32) -> Result<Page> {
        let request = match user {
            Some(user) => self.client.get(endpoint(
                &self.api_base,
                &["api", "v4", "users", user, "starred_projects"],
            )?),
            None => self
                .client
                .get(endpoint(&self.api_base, &["api", "v4", "projects"])?)
                .query(&[("starred", "true")]),
        };

        let request = request
            .query(&[("page", page), ("per_page", self.per_page)])
            .header(TOKEN_HEADER, token);

        let (raw, headers): (Vec<serde_json::Value>, _) =
            send_json(NAME, request, self.timeout).await?;

        let last_page = numeric_header(&headers, TOTAL_PAGES_HEADER)
            .and_then(|pages| u32::try_from(pages).ok())
            .or_else(|| last_page_from_link(&headers));

        Ok(Page::new(translate_items(NAME, raw, translate), last_page))
    }
}

// =============================================================================
// Native Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Project {
    id: Option<u64>,
    name: Option<String>,
    path_with_namespace: Option<String>,
    namespace: Option<Namespace>,
    web_url: Option<String>,
    description: Option<String>,
    star_count: Option<u64>,
    #[serde(default)]
    topics: Vec<String>,
    /// Pre-15.0 servers call topics `tag_list`.
    #[serde(default)]
    tag_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Namespace {
    full_path: Option<String>,
    path: Option<String>,
}

fn translate(project: Project) -> Result<Star> {
    let owner = project
        .namespace
        .and_then(|ns| ns.full_path.or(ns.path))
        .or_else(|| {
            project
                .path_with_namespace
                .as_deref()
                .and_then(|full| full.rsplit_once('/'))
                .map(|(namespace, _)| namespace.to_string())
        });
    let topics = if project.topics.is_empty() {
        project.tag_list
    } else {
        project.topics
    };

    let remote_id = project.id.map(|id| id.to_string()).unwrap_or_default();
    let mut builder = Star::builder(NAME, remote_id)
        .description(project.description)
        .stargazers(project.star_count)
        .topics(topics);

    if let Some(name) = project.name {
        builder = builder.name(name);
    }
    if let Some(owner) = owner {
        builder = builder.owner(owner);
    }
    if let Some(full_name) = project.path_with_namespace {
        builder = builder.full_name(full_name);
    }
    if let Some(url) = project.web_url {
        builder = builder.url(url);
    }

    builder.build()
}

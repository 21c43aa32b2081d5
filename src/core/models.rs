//! Normalized star records.
//!
//! A [`Star`] is one starred repository, independent of the service it came
//! from. Backends build them while translating native API items and never
//! touch them again; the renderer receives them through the star stream as
//! [`StarResult`] items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StarfetchError};

// =============================================================================
// Star
// =============================================================================

/// One starred repository.
///
/// # Fields
/// - `id`: service-qualified identifier, e.g. `github:1296269`.
/// - `full_name`: `owner/name` as the service spells it (GitLab namespaces may
///   contain several segments).
/// - `stargazers`: star count on the service, when reported.
/// - `starred_at`: when the user starred it, when reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    id: String,
    service: String,
    name: String,
    owner: String,
    full_name: String,
    url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    stargazers: Option<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    topics: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    starred_at: Option<DateTime<Utc>>,
}

impl Star {
    /// Start building a star; see [`StarBuilder::build`] for the checks applied.
    #[must_use]
    pub fn builder(service: &str, remote_id: impl ToString) -> StarBuilder {
        StarBuilder {
            service: service.to_string(),
            remote_id: remote_id.to_string(),
            ..StarBuilder::default()
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub const fn stargazers(&self) -> Option<u64> {
        self.stargazers
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub const fn starred_at(&self) -> Option<DateTime<Utc>> {
        self.starred_at
    }
}

/// Builder used by backends while translating native items.
#[derive(Debug, Default)]
pub struct StarBuilder {
    service: String,
    remote_id: String,
    name: Option<String>,
    owner: Option<String>,
    full_name: Option<String>,
    url: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
    language: Option<String>,
    stargazers: Option<u64>,
    topics: Vec<String>,
    starred_at: Option<DateTime<Utc>>,
}

impl StarBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = non_blank(description);
        self
    }

    #[must_use]
    pub fn homepage(mut self, homepage: Option<String>) -> Self {
        self.homepage = non_blank(homepage);
        self
    }

    #[must_use]
    pub fn language(mut self, language: Option<String>) -> Self {
        self.language = non_blank(language);
        self
    }

    #[must_use]
    pub const fn stargazers(mut self, stargazers: Option<u64>) -> Self {
        self.stargazers = stargazers;
        self
    }

    #[must_use]
    pub fn topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    #[must_use]
    pub const fn starred_at(mut self, starred_at: Option<DateTime<Utc>>) -> Self {
        self.starred_at = starred_at;
        self
    }

    /// Finish the star.
    ///
    /// `name`, `owner` and `url` are required and must not be blank.
    /// `full_name` defaults to `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::RecordTranslation`] naming the first missing field.
    pub fn build(self) -> Result<Star> {
        let service = self.service;
        let missing = |field: &str| StarfetchError::RecordTranslation {
            service: service.clone(),
            reason: format!("record {} has no {field}", self.remote_id),
        };

        if self.remote_id.trim().is_empty() {
            return Err(StarfetchError::RecordTranslation {
                service: service.clone(),
                reason: "record has no id".to_string(),
            });
        }
        let name = non_blank(self.name).ok_or_else(|| missing("name"))?;
        let owner = non_blank(self.owner).ok_or_else(|| missing("owner"))?;
        let url = non_blank(self.url).ok_or_else(|| missing("url"))?;
        let full_name = non_blank(self.full_name).unwrap_or_else(|| format!("{owner}/{name}"));

        Ok(Star {
            id: format!("{service}:{}", self.remote_id),
            service,
            name,
            owner,
            full_name,
            url,
            description: self.description,
            homepage: self.homepage,
            language: self.language,
            stargazers: self.stargazers,
            topics: self.topics,
            starred_at: self.starred_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Stream Item
// =============================================================================

/// One item on the star stream: a record, or the error that replaced it.
#[derive(Debug)]
pub enum StarResult {
    /// A translated record.
    Star(Star),
    /// A failed page or a record that could not be translated.
    Error(StarfetchError),
}

impl StarResult {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The record, if this item carries one.
    #[must_use]
    pub const fn star(&self) -> Option<&Star> {
        match self {
            Self::Star(star) => Some(star),
            Self::Error(_) => None,
        }
    }
}

impl From<Result<Star>> for StarResult {
    fn from(result: Result<Star>) -> Self {
        match result {
            Ok(star) => Self::Star(star),
            Err(err) => Self::Error(err),
        }
    }
}

//! Hosting-service backends and their registry.
//!
//! A [`Service`] knows how to log in to one hosting API and fetch one page
//! of a user's starred repositories. The paging loop itself is shared by
//! every backend through [`Service::fetch_stars`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::models::StarResult;
use super::pagination::{Page, PageCursor};
use super::prompt::{Prompter, Question, ask_required};
use super::registry::canonical_key;
use crate::error::{Result, StarfetchError};

/// One hosting service (GitHub, GitLab, ...).
#[async_trait]
pub trait Service: Send + Sync {
    /// Canonical registry name, e.g. `"github"`.
    fn name(&self) -> &'static str;

    /// Name shown to humans, e.g. `"GitHub"`.
    fn display_name(&self) -> &'static str;

    /// Text of the token prompt shown by [`Service::login`].
    fn token_prompt(&self) -> &'static str;

    /// Interactively obtain a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::Credential`] if the prompt is aborted or the
    /// token is left empty.
    fn login(&self, prompter: &dyn Prompter) -> Result<String> {
        let question = Question::secret("token", self.token_prompt());
        ask_required(prompter, self.name(), &question)
    }

    /// Request one page of starred repositories.
    ///
    /// `user == None` means the authenticated user. Native items that cannot
    /// be translated come back as [`StarResult::Error`] in their position.
    ///
    /// # Errors
    ///
    /// Returns the classified request failure; the caller decides how to
    /// report it.
    async fn fetch_page(&self, token: &str, user: Option<&str>, page: u32) -> Result<Page>;

    /// Stream every starred repository of `user` into `destination`.
    ///
    /// Pages are requested from 1 up to the last page the service reports.
    /// A failed page produces exactly one error item and leaves the known last
    /// page untouched; the cursor moves on either way. `destination` is
    /// dropped, closing the stream, once the final page has been emitted.
    async fn fetch_stars(
        &self,
        destination: mpsc::Sender<StarResult>,
        token: &str,
        user: Option<&str>,
    ) {
        let user = user.filter(|u| !u.trim().is_empty());
        let mut cursor = PageCursor::new();

        while cursor.has_more() {
            let page = cursor.current();
            tracing::debug!(service = self.name(), page, "Requesting page");

            let items = match self.fetch_page(token, user, page).await {
                Ok(fetched) => {
                    cursor.observe(fetched.last_page);
                    tracing::debug!(
                        service = self.name(),
                        page,
                        last_page = cursor.last(),
                        items = fetched.items.len(),
                        "Fetched page"
                    );
                    fetched.items
                }
                Err(e) => {
                    tracing::warn!(service = self.name(), page, error = %e, "Page fetch failed");
                    vec![StarResult::Error(StarfetchError::page_fetch(
                        self.name(),
                        page,
                        e,
                    ))]
                }
            };

            for item in items {
                if destination.send(item).await.is_err() {
                    tracing::debug!(service = self.name(), page, "Consumer went away, stopping");
                    return;
                }
            }

            cursor.advance();
        }
    }
}

// =============================================================================
// Service Registry
// =============================================================================

/// Maps canonical service names to backends.
#[derive(Default, Clone)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn Service>>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its canonical name. A later registration
    /// under the same name replaces the earlier one.
    pub fn register(&mut self, service: Arc<dyn Service>) {
        let key = canonical_key(service.name());
        if self.services.insert(key.clone(), service).is_some() {
            tracing::debug!(service = %key, "Replacing registered service");
        }
    }

    /// Find the backend registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::UnknownService`] if nothing was registered
    /// under that name. There is no fallback.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Service>> {
        self.services
            .get(&canonical_key(name))
            .cloned()
            .ok_or_else(|| StarfetchError::UnknownService {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered backends, sorted by name.
    #[must_use]
    pub fn services(&self) -> Vec<Arc<dyn Service>> {
        self.names()
            .iter()
            .filter_map(|name| self.services.get(name).cloned())
            .collect()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish()
    }
}

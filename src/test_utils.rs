//! Test utilities for starfetch.
//!
//! Provides test data factories, scripted collaborators (service, prompter,
//! output, token store) and assertion macros for use across all test
//! modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use starfetch::test_utils::*;
//!
//! let service = ScriptedService::named("github")
//!     .with_page(Ok(page_of("github", 1, 2, Some(2))))
//!     .with_page(Ok(page_of("github", 3, 2, Some(2))));
//! let output = RecordingOutput::new();
//! ```

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::credentials::TokenStore;
use crate::core::models::{Star, StarResult};
use crate::core::pagination::Page;
use crate::core::pipeline::STREAM_CAPACITY;
use crate::core::prompt::{Prompter, Question};
use crate::core::service::Service;
use crate::error::{ExitCode, Result, StarfetchError};
use crate::render::{Fatal, Output};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Test Data Factories
// =============================================================================

/// Create a minimal `Star` for `owner/name` on `service`.
///
/// The URL is `https://{service}.com/{owner}/{name}`.
///
/// # Panics
///
/// Panics if `owner` or `name` is blank.
#[must_use]
pub fn make_test_star(service: &str, id: u64, owner: &str, name: &str) -> Star {
    Star::builder(service, id)
        .name(name)
        .owner(owner)
        .url(format!("https://{service}.com/{owner}/{name}"))
        .build()
        .expect("test star is valid")
}

/// A page of `count` stars with ids starting at `first_id`.
#[must_use]
pub fn page_of(service: &str, first_id: u64, count: usize, last_page: Option<u32>) -> Page {
    let items = (first_id..)
        .take(count)
        .map(|id| StarResult::Star(make_test_star(service, id, "owner", &format!("repo-{id}"))))
        .collect();
    Page::new(items, last_page)
}

/// Run `service.fetch_stars` to completion and collect everything it sent.
pub async fn collect_stream(service: &dyn Service, user: Option<&str>) -> Vec<StarResult> {
    let (tx, mut rx) = mpsc::channel(STREAM_CAPACITY);
    let collect = async {
        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }
        items
    };
    let ((), items) = tokio::join!(service.fetch_stars(tx, "test-token", user), collect);
    items
}

/// Sample config file content.
#[must_use]
pub fn make_test_config_toml() -> String {
    r#"[general]
service = "gitlab"
timeout_seconds = 20
per_page = 50

[output]
format = "json"
color = false
pretty = false

[services.gitlab]
api_base = "https://gitlab.example.com"
"#
    .to_string()
}

// =============================================================================
// Scripted Service
// =============================================================================

/// A [`Service`] that serves pre-built pages in request order.
///
/// Once the script runs out it answers with empty final pages.
pub struct ScriptedService {
    name: &'static str,
    display: &'static str,
    pages: Mutex<VecDeque<Result<Page>>>,
    requests: Mutex<Vec<(u32, Option<String>, String)>>,
    panics: bool,
}

impl ScriptedService {
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            display: name,
            pages: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            panics: false,
        }
    }

    #[must_use]
    pub const fn with_display(mut self, display: &'static str) -> Self {
        self.display = display;
        self
    }

    /// Queue the response to the next page request.
    #[must_use]
    pub fn with_page(self, page: Result<Page>) -> Self {
        lock(&self.pages).push_back(page);
        self
    }

    /// Panic on the first page request.
    #[must_use]
    pub const fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    /// Page numbers requested so far.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<u32> {
        lock(&self.requests).iter().map(|(page, _, _)| *page).collect()
    }

    /// User argument of each request.
    #[must_use]
    pub fn requested_users(&self) -> Vec<Option<String>> {
        lock(&self.requests)
            .iter()
            .map(|(_, user, _)| user.clone())
            .collect()
    }

    /// Token of each request.
    #[must_use]
    pub fn requested_tokens(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|(_, _, token)| token.clone())
            .collect()
    }
}

#[async_trait]
impl Service for ScriptedService {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        self.display
    }

    fn token_prompt(&self) -> &'static str {
        "Scripted token"
    }

    async fn fetch_page(&self, token: &str, user: Option<&str>, page: u32) -> Result<Page> {
        lock(&self.requests).push((page, user.map(str::to_string), token.to_string()));
        assert!(!self.panics, "scripted service panicked on page {page}");
        lock(&self.pages)
            .pop_front()
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

// =============================================================================
// Scripted Prompter
// =============================================================================

/// A [`Prompter`] with a fixed answer, or one that always aborts.
pub struct ScriptedPrompter {
    answer: Option<String>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            asked: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn aborting() -> Self {
        Self {
            answer: None,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Question texts asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &Question) -> Result<String> {
        lock(&self.asked).push(question.text.clone());
        self.answer
            .clone()
            .ok_or_else(|| StarfetchError::Other(anyhow::anyhow!("interrupted")))
    }
}

// =============================================================================
// Recording Output
// =============================================================================

/// An [`Output`] that records every call as `"info: ..."`, `"error: ..."` or
/// `"fatal: ..."`. Records format as their full name.
pub struct RecordingOutput {
    name: &'static str,
    events: Mutex<Vec<String>>,
    fail_format: bool,
}

impl RecordingOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::named("recording")
    }

    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            events: Mutex::new(Vec::new()),
            fail_format: false,
        }
    }

    /// An output whose `format_star` always fails.
    #[must_use]
    pub fn failing_format() -> Self {
        Self {
            fail_format: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn events(&self) -> Vec<String> {
        lock(&self.events).clone()
    }

    fn with_prefix(&self, prefix: &str) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| event.strip_prefix(prefix).map(str::to_string))
            .collect()
    }

    #[must_use]
    pub fn infos(&self) -> Vec<String> {
        self.with_prefix("info: ")
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.with_prefix("error: ")
    }

    #[must_use]
    pub fn fatals(&self) -> Vec<String> {
        self.with_prefix("fatal: ")
    }
}

impl Default for RecordingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for RecordingOutput {
    fn name(&self) -> &'static str {
        self.name
    }

    fn info(&self, message: &str) {
        lock(&self.events).push(format!("info: {message}"));
    }

    fn error(&self, message: &str) {
        lock(&self.events).push(format!("error: {message}"));
    }

    fn fatal(&self, message: &str) -> Fatal {
        lock(&self.events).push(format!("fatal: {message}"));
        Fatal::new(ExitCode::GeneralError)
    }

    fn format_star(&self, star: &Star) -> Result<String> {
        if self.fail_format {
            return Err(StarfetchError::Other(anyhow::anyhow!(
                "cannot format {}",
                star.id()
            )));
        }
        Ok(star.full_name().to_string())
    }
}

// =============================================================================
// Token Store
// =============================================================================

/// An in-memory [`TokenStore`].
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with(service: &str, token: &str) -> Self {
        let store = Self::default();
        lock(&store.tokens).insert(service.to_string(), token.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, service: &str) -> Option<String> {
        lock(&self.tokens).get(service).cloned()
    }

    fn save(&self, service: &str, token: &str) -> Result<()> {
        lock(&self.tokens).insert(service.to_string(), token.to_string());
        Ok(())
    }

    fn delete(&self, service: &str) -> Result<()> {
        lock(&self.tokens).remove(service);
        Ok(())
    }
}

// =============================================================================
// Writers
// =============================================================================

/// A cloneable in-memory writer for inspecting output sinks.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner)).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A writer that always fails.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

// =============================================================================
// Temporary Directories
// =============================================================================

/// An isolated temporary directory, removed on drop.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn create_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.inner.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that a string does NOT contain a substring.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that every non-empty line of a string is valid JSON.
#[macro_export]
macro_rules! assert_json_lines {
    ($text:expr) => {
        for line in $text.lines().filter(|line| !line.trim().is_empty()) {
            if let Err(e) = serde_json::from_str::<serde_json::Value>(line) {
                panic!("Expected JSON line, parsing failed: {e}\n\nLine:\n{line}");
            }
        }
    };
}

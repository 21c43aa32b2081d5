//! Page cursor and pagination header parsing.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use reqwest::header::HeaderMap;

use super::models::StarResult;

/// Matches one `<url>; rel="name"` entry of an RFC 8288 `Link` header.
static LINK_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("valid link regex"));

/// Position within one paginated fetch.
///
/// Starts at page 1 with a last page of 1, so the first page is always
/// requested. Lives only as long as a single fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: u32,
    last: u32,
}

impl PageCursor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: 1,
            last: 1,
        }
    }

    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// Whether the current page still has to be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current <= self.last
    }

    /// Record the last page a successful response reported.
    ///
    /// A response without pagination information means the current page is
    /// the last one.
    pub fn observe(&mut self, reported_last: Option<u32>) {
        self.last = reported_last.unwrap_or(self.current);
    }

    /// Move to the next page. Called after every page, failed or not.
    ///
    /// Past `u32::MAX` there is no next page, so the cursor finishes.
    pub const fn advance(&mut self) {
        match self.current.checked_add(1) {
            Some(next) => self.current = next,
            None => self.last = self.current - 1,
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// One fetched page: its translated items in native order, plus the last
/// page number the service reported (if any).
#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<StarResult>,
    pub last_page: Option<u32>,
}

impl Page {
    #[must_use]
    pub const fn new(items: Vec<StarResult>, last_page: Option<u32>) -> Self {
        Self { items, last_page }
    }
}

/// Extract the `page` query parameter of the `rel="last"` link.
#[must_use]
pub fn last_page_from_link(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(reqwest::header::LINK)?.to_str().ok()?;

    LINK_ENTRY
        .captures_iter(link)
        .find(|caps| caps[2].split_whitespace().any(|rel| rel == "last"))
        .and_then(|caps| Url::parse(&caps[1]).ok())
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse().ok())
        })
}

/// Read a numeric header such as GitLab's `X-Total-Pages`.
#[must_use]
pub fn numeric_header(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

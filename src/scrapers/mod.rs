//! Site scrapers for the blog and news sources.
//!
//! Each scraper follows the same shape:
//!
//! 1. **Listing**: fetch one fixed listing page and select its items
//! 2. **Extraction**: read fields out of each item (or each linked page)
//!    with a site-specific [`FieldExtractor`]
//! 3. **Caching**: hand the assembled [`Table`](crate::table::Table) to the
//!    cache gate, which persists it or serves a previous snapshot
//!
//! # Supported Sources
//!
//! | Source | Module | Listing | Item |
//! |--------|--------|---------|------|
//! | Codeup blog | [`codeup`] | `h2.entry-title` on the blog index | Linked article page |
//! | Inshorts | [`inshorts`] | `.news-card` on each section page | The card itself |
//!
//! All HTTP goes through the [`Fetch`] trait, one request at a time, so the
//! extraction and cache logic can be exercised against fixture HTML.

use crate::error::{Error, Result};
use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Selector};
use std::path::PathBuf;
use tracing::{debug, instrument};

pub mod codeup;
pub mod inshorts;

/// Issue a single HTTP GET and return the response body.
pub trait Fetch {
    /// Fetch `url` sending `user_agent` as the `User-Agent` header.
    async fn get(&self, url: &str, user_agent: &str) -> Result<String>;
}

/// [`Fetch`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip(self, user_agent))]
    async fn get(&self, url: &str, user_agent: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Pull one record's worth of fields out of a scoped piece of markup.
///
/// Implementations own a site's fixed selectors, so a markup change on one
/// site is fixed in exactly one place.
pub trait FieldExtractor {
    type Record;

    fn extract(&self, scope: ElementRef<'_>) -> Result<Self::Record>;
}

/// Where a source lives and how to ask it for pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Listing page URL, or the base URL section slugs are appended to.
    pub base_url: String,
    pub user_agent: String,
    /// Snapshot written after a fetch and read on `cached` runs.
    pub cache_path: PathBuf,
}

impl SourceConfig {
    /// Place this source's snapshot under `dir`, keeping its file name.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let file_name = self
            .cache_path
            .file_name()
            .map(|name| name.to_owned())
            .unwrap_or_default();
        self.cache_path = dir.into().join(file_name);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

pub(crate) fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(format!("{css}: {e}")))
}

/// Concatenated text of the first element under `scope` matching `css`.
pub(crate) fn required_text(scope: ElementRef<'_>, css: &'static str) -> Result<String> {
    optional_text(scope, css)?.ok_or(Error::MissingElement { selector: css })
}

/// Like [`required_text`], but an absent element is `None` rather than an error.
pub(crate) fn optional_text(scope: ElementRef<'_>, css: &'static str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(scope
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Fetch;
    use crate::error::{Error, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory [`Fetch`] that serves canned pages and records every request.
    #[derive(Default)]
    pub struct FixtureFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl FixtureFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        /// `(url, user_agent)` pairs in request order.
        pub fn requests(&self) -> Vec<(String, String)> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Fetch for FixtureFetcher {
        async fn get(&self, url: &str, user_agent: &str) -> Result<String> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), user_agent.to_string()));
            self.pages.get(url).cloned().ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no fixture for {url}"),
                ))
            })
        }
    }

    /// A fresh, not-yet-created directory under the system temp dir.
    pub fn temp_cache_dir(label: &str) -> std::path::PathBuf {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("scrape_prep_{label}_{}_{n}", std::process::id()))
    }
}

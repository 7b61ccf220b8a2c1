//! Codeup blog scraper.
//!
//! Scrapes posts from the [Codeup blog](https://codeup.com/blog/). The blog
//! index lists each post as an `h2.entry-title` wrapping a link; every post
//! is then fetched on its own page for its title, date and body.
//!
//! The site rejects requests without a user-agent, so every GET carries
//! [`USER_AGENT`] unless the caller overrides it.

use super::{Fetch, FieldExtractor, SourceConfig, optional_text, required_text, selector};
use crate::cache;
use crate::error::{Error, Result};
use crate::models::BlogArticle;
use crate::table::Table;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt, TryStreamExt};
use scraper::{ElementRef, Html};
use std::path::PathBuf;
use tracing::{debug, info, instrument};
use url::Url;

pub const BLOG_URL: &str = "https://codeup.com/blog/";
pub const USER_AGENT: &str = "Codeup DS Hopper";
pub const CACHE_FILE: &str = "codeup_blog_articles.json";

const LISTING_ITEM: &str = "h2.entry-title";
const ITEM_LINK: &str = "a";
const TITLE: &str = "h1.entry-title";
const PUBLISHED: &str = "span.published";
const CONTENT: &str = "div.entry-content";

/// Default source settings: the blog index, its user-agent, and a snapshot
/// in the working directory.
pub fn config() -> SourceConfig {
    SourceConfig {
        base_url: BLOG_URL.to_string(),
        user_agent: USER_AGENT.to_string(),
        cache_path: PathBuf::from(CACHE_FILE),
    }
}

/// Listing items of a parsed blog index, in document order.
pub fn listing_items(document: &Html) -> Result<Vec<ElementRef<'_>>> {
    let sel = selector(LISTING_ITEM)?;
    Ok(document.select(&sel).collect())
}

/// The `href` of the first anchor inside one listing item.
pub fn get_link(item: ElementRef<'_>) -> Result<String> {
    let sel = selector(ITEM_LINK)?;
    let anchor = item
        .select(&sel)
        .next()
        .ok_or(Error::MissingElement { selector: ITEM_LINK })?;
    anchor
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or(Error::MissingAttribute {
            attribute: "href",
            selector: ITEM_LINK,
        })
}

/// Fetch the blog index and return every post link, resolved against the
/// index URL, in document order.
#[instrument(level = "info", skip_all, fields(url = %config.base_url))]
pub async fn get_links<F: Fetch>(fetcher: &F, config: &SourceConfig) -> Result<Vec<String>> {
    let base = Url::parse(&config.base_url)?;
    let html = fetcher.get(&config.base_url, &config.user_agent).await?;
    let document = Html::parse_document(&html);

    let links = listing_items(&document)?
        .into_iter()
        .map(|item| -> Result<String> { Ok(base.join(&get_link(item)?)?.to_string()) })
        .collect::<Result<Vec<_>>>()?;

    info!(count = links.len(), "Indexed blog post links");
    debug!(links = ?links, "Blog links");
    Ok(links)
}

/// Field extractor for a single blog post page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogPage;

impl FieldExtractor for BlogPage {
    type Record = BlogArticle;

    fn extract(&self, scope: ElementRef<'_>) -> Result<BlogArticle> {
        Ok(BlogArticle {
            title: required_text(scope, TITLE)?.trim().to_string(),
            date_published: optional_text(scope, PUBLISHED)?.map(|d| d.trim().to_string()),
            article_content: required_text(scope, CONTENT)?.trim().to_string(),
        })
    }
}

/// Fetch and extract one blog post.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn fetch_article<F: Fetch>(
    fetcher: &F,
    config: &SourceConfig,
    url: &str,
) -> Result<BlogArticle> {
    let html = fetcher.get(url, &config.user_agent).await?;
    let document = Html::parse_document(&html);
    let article = BlogPage.extract(document.root_element())?;
    debug!(
        title = %article.title,
        preview = %truncate_for_log(&article.article_content, 120),
        "Parsed blog post"
    );
    Ok(article)
}

/// Fetch every post linked from the blog index, one after another.
///
/// The first post that fails to fetch or parse aborts the whole batch.
#[instrument(level = "info", skip_all)]
pub async fn fetch_articles<F: Fetch>(
    fetcher: &F,
    config: &SourceConfig,
) -> Result<Vec<BlogArticle>> {
    let links = get_links(fetcher, config).await?;
    let articles: Vec<BlogArticle> = stream::iter(links)
        .then(move |link| async move { fetch_article(fetcher, config, &link).await })
        .try_collect()
        .await?;

    info!(count = articles.len(), "Fetched blog posts");
    Ok(articles)
}

/// Blog posts as a table, served from the snapshot when `cached` is set.
///
/// See [`cache::load_or_fetch`] for the cache contract.
#[instrument(level = "info", skip_all, fields(cached = cached))]
pub async fn get_blog_articles<F: Fetch>(
    fetcher: &F,
    config: &SourceConfig,
    cached: bool,
) -> Result<Table> {
    cache::load_or_fetch(&config.cache_path, cached, move || async move {
        Table::from_records(&fetch_articles(fetcher, config).await?)
    })
    .await
}

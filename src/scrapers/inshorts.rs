//! Inshorts news scraper.
//!
//! Scrapes the short-form cards Inshorts lists on each of its section pages,
//! e.g. `https://inshorts.com/en/read/business`. Everything needed lives on
//! the card itself, so unlike the blog there is no per-item page fetch.
//!
//! # Card Markup
//!
//! | Field | Selector |
//! |-------|----------|
//! | title | `span[itemprop="headline"]` |
//! | author | `span.author` |
//! | content | `div[itemprop="articleBody"]` |
//! | date | `span[clas="date"]` |
//!
//! The date span really is marked up with a `clas` attribute (sic) on every
//! card the site serves; the selector matches that, not `class`.

use super::{Fetch, FieldExtractor, SourceConfig, optional_text, required_text, selector};
use crate::cache;
use crate::error::Result;
use crate::models::{CardFields, NewsArticle};
use crate::table::Table;
use scraper::{ElementRef, Html};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

pub const BASE_URL: &str = "https://inshorts.com/en/read/";
pub const USER_AGENT: &str = "ds_student";
pub const CACHE_FILE: &str = "inshort_news_articles.json";
pub const SECTIONS: [&str; 4] = ["business", "sports", "technology", "entertainment"];

const CARD: &str = ".news-card";
const HEADLINE: &str = r#"span[itemprop="headline"]"#;
const AUTHOR: &str = "span.author";
const BODY: &str = r#"div[itemprop="articleBody"]"#;
const DATE: &str = r#"span[clas="date"]"#;

/// Default source settings: the section base URL, its user-agent, and a
/// snapshot in the working directory.
pub fn config() -> SourceConfig {
    SourceConfig {
        base_url: BASE_URL.to_string(),
        user_agent: USER_AGENT.to_string(),
        cache_path: PathBuf::from(CACHE_FILE),
    }
}

/// The default section list as owned strings.
#[cfg(test)]
pub fn default_sections() -> Vec<String> {
    SECTIONS.iter().map(|s| s.to_string()).collect()
}

pub fn section_url(config: &SourceConfig, section: &str) -> String {
    format!("{}{}", config.base_url, urlencoding::encode(section))
}

/// Field extractor for a single news card.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsCard;

impl FieldExtractor for NewsCard {
    type Record = CardFields;

    fn extract(&self, scope: ElementRef<'_>) -> Result<CardFields> {
        Ok(CardFields {
            title: required_text(scope, HEADLINE)?,
            author: optional_text(scope, AUTHOR)?,
            content: required_text(scope, BODY)?,
            date_published: optional_text(scope, DATE)?,
        })
    }
}

/// Extract every card on a parsed section page, in document order.
pub fn parse_section(document: &Html, section: &str) -> Result<Vec<NewsArticle>> {
    let sel = selector(CARD)?;
    document
        .select(&sel)
        .map(|card| {
            NewsCard
                .extract(card)
                .map(|fields| NewsArticle::from_card(section, fields))
        })
        .collect()
}

/// Fetch one section page and extract its cards.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn fetch_section<F: Fetch>(
    fetcher: &F,
    config: &SourceConfig,
    section: &str,
) -> Result<Vec<NewsArticle>> {
    let url = section_url(config, section);
    let html = fetcher.get(&url, &config.user_agent).await?;
    let document = Html::parse_document(&html);
    let articles = parse_section(&document, section)?;
    debug!(count = articles.len(), "Parsed section cards");
    Ok(articles)
}

/// Fetch every section in order and concatenate their cards.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn fetch_articles<F: Fetch>(
    fetcher: &F,
    config: &SourceConfig,
    sections: &[String],
) -> Result<Vec<NewsArticle>> {
    let mut articles = Vec::new();
    for section in sections {
        articles.extend(fetch_section(fetcher, config, section).await?);
    }
    info!(count = articles.len(), "Fetched news cards");
    Ok(articles)
}

/// News cards as a table, served from the snapshot when `cached` is set.
///
/// See [`cache::load_or_fetch`] for the cache contract.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn get_news_articles<F: Fetch>(
    fetcher: &F,
    config: &SourceConfig,
    sections: &[String],
    cached: bool,
) -> Result<Table> {
    cache::load_or_fetch(&config.cache_path, cached, move || async move {
        Table::from_records(&fetch_articles(fetcher, config, sections).await?)
    })
    .await
}

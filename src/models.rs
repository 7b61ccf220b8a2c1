//! Data models for scraped articles.
//!
//! This module defines the records produced by the two acquisition routines:
//! - [`BlogArticle`]: one post from the Codeup blog
//! - [`NewsArticle`]: one card from an Inshorts news section
//!
//! Records are flat and carry no identifier. They are collected into a
//! [`Table`](crate::table::Table) for persistence and cleaning; field order
//! here is the column order of the resulting snapshot.

use serde::{Deserialize, Serialize};

/// A single Codeup blog post.
///
/// # Fields
///
/// * `title` - Text of the post's `h1.entry-title`
/// * `date_published` - Text of `span.published`, when the page has one
/// * `article_content` - Trimmed text of `div.entry-content`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlogArticle {
    pub title: String,
    pub date_published: Option<String>,
    pub article_content: String,
}

/// The fields read from one Inshorts news card, before the section label is
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub title: String,
    pub author: Option<String>,
    pub content: String,
    pub date_published: Option<String>,
}

/// A single Inshorts news card, labelled with the section it was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsArticle {
    /// The section slug, e.g. `"business"`.
    pub section: String,
    pub title: String,
    pub author: Option<String>,
    pub content: String,
    pub date_published: Option<String>,
}

impl NewsArticle {
    pub fn from_card(section: &str, card: CardFields) -> Self {
        Self {
            section: section.to_string(),
            title: card.title,
            author: card.author,
            content: card.content,
            date_published: card.date_published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_article_from_card() {
        let card = CardFields {
            title: "Markets rally".to_string(),
            author: Some("Jane Doe".to_string()),
            content: "Stocks rose.".to_string(),
            date_published: None,
        };
        let article = NewsArticle::from_card("business", card);
        assert_eq!(article.section, "business");
        assert_eq!(article.title, "Markets rally");
        assert_eq!(article.author.as_deref(), Some("Jane Doe"));
        assert_eq!(article.date_published, None);
    }

    #[test]
    fn test_blog_article_serializes_fields_in_order() {
        let article = BlogArticle {
            title: "Hello".to_string(),
            date_published: None,
            article_content: "Body".to_string(),
        };
        let json = serde_json::to_string(&article).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Hello","date_published":null,"article_content":"Body"}"#
        );
    }

    #[test]
    fn test_news_article_deserialization() {
        let json = r#"{
            "section": "sports",
            "title": "Final score",
            "author": null,
            "content": "A close game.",
            "date_published": "16 Oct 2026"
        }"#;
        let article: NewsArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.section, "sports");
        assert_eq!(article.author, None);
        assert_eq!(article.date_published.as_deref(), Some("16 Oct 2026"));
    }
}

//! Data models for search requests, normalized articles and rendered pages.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Field`]: The fixed set of display fields and their fallback values
//! - [`NormalizedRecord`]: A display-ready article with every field populated
//! - [`SearchRequest`]: The query and page handed to the fetcher
//! - [`SearchPage`]: One rendered page of results
//!
//! Raw upstream articles are not modelled here. They stay untyped
//! [`serde_json::Value`]s until [`crate::normalize`] turns them into
//! [`NormalizedRecord`]s.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Placeholder shown when an article carries no image.
pub const DEFAULT_IMAGE: &str = "https://placehold.co/400x200?text=Image+Unavailable";

/// Query used when the caller supplies none.
pub const DEFAULT_QUERY: &str = "tecnologia";

/// One of the six display fields of an article.
///
/// Each field knows where it lives in the upstream JSON and what to show
/// when the upstream value is missing or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Author,
    Url,
    UrlToImage,
    SourceName,
}

impl Field {
    /// All fields, in display order.
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Description,
        Field::Author,
        Field::Url,
        Field::UrlToImage,
        Field::SourceName,
    ];

    /// The key holding this field in an upstream article.
    ///
    /// `SourceName` is `name` inside the nested `source` object.
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Author => "author",
            Field::Url => "url",
            Field::UrlToImage => "urlToImage",
            Field::SourceName => "name",
        }
    }

    /// Dotted path of the field in an upstream article, for diagnostics.
    pub fn path(self) -> &'static str {
        match self {
            Field::SourceName => "source.name",
            other => other.key(),
        }
    }

    /// The fallback used when the upstream value is absent, null or blank.
    pub fn default_value(self) -> &'static str {
        match self {
            Field::Title => "Title unavailable",
            Field::Description => "No description available",
            Field::Author => "Unknown author",
            Field::Url => "#",
            Field::UrlToImage => DEFAULT_IMAGE,
            Field::SourceName => "Source unspecified",
        }
    }
}

/// A display-ready article.
///
/// Every field is a non-empty string without surrounding whitespace. Values
/// are only ever built by [`crate::normalize::normalize`] or
/// [`NormalizedRecord::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NormalizedRecord {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    #[serde(rename = "urlToImage")]
    pub url_to_image: String,
    pub source_name: String,
}

impl NormalizedRecord {
    /// Read a field by its [`Field`] tag.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Author => &self.author,
            Field::Url => &self.url,
            Field::UrlToImage => &self.url_to_image,
            Field::SourceName => &self.source_name,
        }
    }

    /// Fields that ended up holding their fallback value.
    pub fn defaulted_fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(|&field| self.get(field) == field.default_value())
    }
}

impl Default for NormalizedRecord {
    /// A record made entirely of fallback values.
    fn default() -> Self {
        Self {
            title: Field::Title.default_value().to_string(),
            description: Field::Description.default_value().to_string(),
            author: Field::Author.default_value().to_string(),
            url: Field::Url.default_value().to_string(),
            url_to_image: Field::UrlToImage.default_value().to_string(),
            source_name: Field::SourceName.default_value().to_string(),
        }
    }
}

/// The query and page number handed to the fetcher.
///
/// `query` is never blank and `page` is never zero; [`SearchRequest::new`]
/// applies the default query and clamps the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
}

impl SearchRequest {
    /// Build a request from raw caller input.
    ///
    /// A missing or blank query becomes [`DEFAULT_QUERY`]; a page below 1
    /// becomes 1.
    pub fn new(query: Option<&str>, page: i64) -> Self {
        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => DEFAULT_QUERY.to_string(),
        };
        Self {
            query,
            page: clamp_page(page),
        }
    }
}

/// Clamp a caller-supplied page number into `1..=u32::MAX`.
pub fn clamp_page(page: i64) -> u32 {
    page.clamp(1, u32::MAX as i64) as u32
}

/// One page of search results, ready for rendering.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchPage {
    /// The search term the page was built for.
    pub query: String,
    /// The 1-based page number.
    pub page: u32,
    /// The page before this one, absent on the first page.
    pub previous_page: Option<u32>,
    /// The page after this one.
    pub next_page: u32,
    /// Local time the page was generated, RFC 3339.
    pub generated_at: String,
    /// The normalized articles, possibly empty.
    pub articles: Vec<NormalizedRecord>,
}

impl SearchPage {
    pub fn new(request: SearchRequest, articles: Vec<NormalizedRecord>) -> Self {
        let page = request.page.max(1);
        Self {
            query: request.query,
            page,
            previous_page: (page > 1).then(|| page - 1),
            next_page: page.saturating_add(1),
            generated_at: Local::now().to_rfc3339(),
            articles,
        }
    }
}

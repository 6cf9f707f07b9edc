//! News search API client with a fail-soft fetch policy.
//!
//! This module talks to a NewsAPI-compatible `everything` endpoint and turns
//! its response into [`NormalizedRecord`]s.
//!
//! # Architecture
//!
//! - [`SearchSource`]: Core trait returning the raw articles of one result page
//! - [`NewsApiClient`]: `reqwest` implementation with a bounded timeout
//! - [`fetch_news`]: Fail-soft entry point that normalizes and never errors
//!
//! # Failure Policy
//!
//! - One attempt per call, no retries and no backoff
//! - Transport errors, timeouts, non-2xx statuses and malformed bodies all
//!   yield an empty list
//! - An article that cannot be normalized is dropped; the rest of the page is kept

use crate::models::NormalizedRecord;
use crate::normalize::normalize;
use crate::utils::{looks_truncated, truncate_for_log};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Endpoint queried when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Language filter sent with every search.
pub const LANGUAGE: &str = "it";

/// Number of articles requested per page.
pub const PAGE_SIZE: u32 = 9;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a search request produced no usable articles.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout, or an error while reading the body.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    Status(StatusCode),
    /// The body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The body was JSON but not shaped like a search response.
    #[error("malformed response: {0}")]
    Malformed(&'static str),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest embeds the request URL, which carries the API key.
        FetchError::Transport(e.without_url())
    }
}

impl FetchError {
    /// A short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(e) if e.is_timeout() => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Json(_) => "json",
            FetchError::Malformed(_) => "malformed",
        }
    }
}

/// A source of raw search results.
///
/// Implementors return the untyped article objects of one result page. The
/// caller is responsible for normalization and for the failure policy.
pub trait SearchSource {
    /// Fetch the raw articles for `query` on the 1-based `page`.
    async fn search(&self, query: &str, page: u32) -> Result<Vec<Value>, FetchError>;
}

/// Process-wide settings for [`NewsApiClient`]. Read-only once built.
#[derive(Clone)]
pub struct NewsApiConfig {
    /// Full URL of the search endpoint.
    pub base_url: Url,
    /// Credential sent as the `apiKey` query parameter.
    pub api_key: String,
    /// Upper bound on the whole request, including reading the body.
    pub timeout: Duration,
}

impl std::fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `reqwest` client for a NewsAPI-compatible search endpoint.
#[derive(Debug)]
pub struct NewsApiClient {
    http: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    /// Build a client whose every request is bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized
    /// (for example when the TLS backend fails to load).
    pub fn new(config: NewsApiConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Query parameters for one search, in the order they are sent.
    fn query_params(&self, query: &str, page: u32) -> [(&'static str, String); 5] {
        [
            ("q", query.to_string()),
            ("language", LANGUAGE.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
            ("apiKey", self.config.api_key.clone()),
        ]
    }
}

impl SearchSource for NewsApiClient {
    #[instrument(level = "info", skip(self), fields(base_url = %self.config.base_url))]
    async fn search(&self, query: &str, page: u32) -> Result<Vec<Value>, FetchError> {
        let t0 = Instant::now();
        let response = self
            .http
            .get(self.config.base_url.clone())
            .query(&self.query_params(query, page))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            body = %truncate_for_log(&body, 500),
            "Received search response"
        );

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                truncated = looks_truncated(&e),
                body_preview = %truncate_for_log(&body, 300),
                "Search response is not valid JSON"
            );
            e
        })?;
        extract_articles(data)
    }
}

/// Pull the `articles` array out of a parsed search response.
///
/// A missing or `null` key yields an empty list.
pub fn extract_articles(data: Value) -> Result<Vec<Value>, FetchError> {
    let Value::Object(mut body) = data else {
        return Err(FetchError::Malformed("response body is not a JSON object"));
    };
    match body.remove("articles") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(articles)) => Ok(articles),
        Some(_) => Err(FetchError::Malformed("`articles` is not an array")),
    }
}

/// Fetch one page of results and normalize it, never failing.
///
/// Any [`FetchError`] is logged and turned into an empty list. Articles that
/// cannot be normalized are logged and skipped.
///
/// # Arguments
///
/// * `source` - Where the raw articles come from
/// * `query` - A non-blank search term
/// * `page` - A 1-based page number
#[instrument(level = "info", skip(source))]
pub async fn fetch_news<S: SearchSource>(source: &S, query: &str, page: u32) -> Vec<NormalizedRecord> {
    let raw_articles = match source.search(query, page).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Search failed; returning no articles");
            return Vec::new();
        }
    };

    let received = raw_articles.len();
    let articles: Vec<NormalizedRecord> = raw_articles
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match normalize(raw) {
            Ok(record) => {
                let defaulted: Vec<&str> = record.defaulted_fields().map(|f| f.key()).collect();
                if !defaulted.is_empty() {
                    debug!(index, ?defaulted, "Article fields fell back to defaults");
                }
                Some(record)
            }
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed article");
                None
            }
        })
        .collect();

    info!(
        received,
        kept = articles.len(),
        skipped = received - articles.len(),
        "Fetched articles"
    );
    articles
}

//! Command-line interface definitions for the news search page.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API settings can be provided via command-line flags or environment variables.

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, NewsApiConfig};
use crate::models::{SearchRequest, DEFAULT_QUERY};
use clap::Parser;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the news search page.
///
/// # Examples
///
/// ```sh
/// # Print the first page for the default query to stdout
/// NEWS_API_KEY=... news_search_page
///
/// # Write page 2 of a search as HTML and JSON
/// news_search_page -q "intelligenza artificiale" -p 2 -o ./pages
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search term; blank or missing uses the default topic
    #[arg(short, long, default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Result page; values below 1 are treated as 1
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Directory for the HTML and JSON pages; prints HTML to stdout when omitted
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Search endpoint URL
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "NEWS_API_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,
}

impl Cli {
    /// The query and clamped page to fetch.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest::new(Some(&self.query), self.page)
    }

    /// Settings for the API client.
    pub fn api_config(&self) -> NewsApiConfig {
        NewsApiConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

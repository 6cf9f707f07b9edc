//! # News Search Page
//!
//! Queries a NewsAPI-compatible search endpoint, normalizes the returned
//! articles into a fixed display schema, and renders them as an HTML page.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... news_search_page -q tecnologia -p 1 -o ./pages
//! ```
//!
//! ## Architecture
//!
//! 1. **Request**: Resolve the query (with a default topic) and clamp the page
//! 2. **Fetching**: One bounded-timeout search request; failures yield no articles
//! 3. **Normalizing**: Fill every missing or blank article field with its fallback
//! 4. **Output**: Render HTML (and JSON when writing to a directory)

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod models;
mod normalize;
mod outputs;
mod utils;

use api::{NewsApiClient, fetch_news};
use cli::Cli;
use models::SearchPage;
use outputs::html::{self, PageRenderer};
use outputs::json;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_search_page starting up");

    let args = Cli::parse();
    let request = args.search_request();
    let config = args.api_config();
    debug!(?request, ?config, output_dir = ?args.output_dir, "Parsed CLI arguments");

    if let Some(ref output_dir) = args.output_dir {
        if let Err(e) = ensure_writable_dir(output_dir).await {
            error!(
                path = %output_dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let renderer = PageRenderer::new()?;
    let client = NewsApiClient::new(config)?;

    // ---- Fetch and normalize ----
    let articles = fetch_news(&client, &request.query, request.page).await;
    info!(query = %request.query, page = request.page, count = articles.len(), "Articles ready");

    let page = SearchPage::new(request, articles);

    // ---- Output ----
    match args.output_dir {
        Some(ref output_dir) => {
            html::write_page(&renderer, &page, output_dir).await?;
            if let Err(e) = json::write_search_page(&page, output_dir).await {
                error!(error = %e, "Failed to write JSON page");
            }
        }
        None => println!("{}", renderer.render(&page)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

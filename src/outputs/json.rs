//! JSON output of a result page.
//!
//! The file sits next to the HTML page and carries the same data the
//! template sees: query, page numbers, timestamp and normalized articles.
//!
//! ```text
//! output_dir/
//! ├── tecnologia_p1.html
//! └── tecnologia_p1.json
//! ```

use crate::models::SearchPage;
use crate::utils::page_file_stem;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`SearchPage`] to `{output_dir}/{slug}_p{page}.json`.
///
/// Creates `output_dir` if needed.
///
/// # Returns
///
/// The path of the written file, or an error if directory creation,
/// serialization or writing fails.
#[instrument(level = "info", skip_all, fields(%output_dir, query = %page.query, page = page.page))]
pub async fn write_search_page(
    page: &SearchPage,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(page)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(output_dir)
        .join(format!("{}.json", page_file_stem(&page.query, page.page)))
        .to_string_lossy()
        .into_owned();

    info!(%path, "Writing JSON");
    fs::write(&path, json).await?;
    info!(%path, articles = page.articles.len(), "Wrote JSON page");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NormalizedRecord, SearchRequest};

    #[tokio::test]
    async fn test_write_search_page() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let dir = dir.to_str().unwrap();

        let page = SearchPage::new(
            SearchRequest::new(Some("tecnologia"), 1),
            vec![NormalizedRecord::default()],
        );
        let path = write_search_page(&page, dir).await.unwrap();
        assert!(path.ends_with("tecnologia_p1.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: SearchPage = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.query, "tecnologia");
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.previous_page, None);
        assert_eq!(parsed.articles, vec![NormalizedRecord::default()]);
    }
}

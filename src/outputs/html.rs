//! HTML rendering of a result page.
//!
//! The page is rendered through a Handlebars template compiled into the
//! binary (`templates/index.hbs`). Handlebars escapes every `{{value}}`
//! interpolation, so upstream text cannot inject markup. Article links and
//! images are only emitted for `http`/`https` URLs; anything else (a
//! `javascript:` link, say) falls back to `#` or the placeholder image.
//!
//! Links to the neighbouring pages point at the files [`write_page`] would
//! produce for them, so a directory of rendered pages can be browsed offline.

use crate::models::{DEFAULT_IMAGE, NormalizedRecord, SearchPage};
use crate::utils::page_file_stem;
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

const INDEX: &str = "index";
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");

/// The template context: the page, its articles with safe links, and the
/// neighbour links.
#[derive(Serialize)]
struct PageView<'a> {
    query: &'a str,
    page: u32,
    generated_at: &'a str,
    articles: Vec<ArticleView<'a>>,
    previous_href: Option<String>,
    next_href: String,
}

/// One article as the template sees it.
#[derive(Serialize)]
struct ArticleView<'a> {
    #[serde(flatten)]
    record: &'a NormalizedRecord,
    href: &'a str,
    image_src: &'a str,
}

impl<'a> PageView<'a> {
    fn new(page: &'a SearchPage) -> Self {
        Self {
            query: &page.query,
            page: page.page,
            generated_at: &page.generated_at,
            articles: page.articles.iter().map(ArticleView::new).collect(),
            previous_href: page
                .previous_page
                .map(|p| format!("{}.html", page_file_stem(&page.query, p))),
            next_href: format!("{}.html", page_file_stem(&page.query, page.next_page)),
        }
    }
}

impl<'a> ArticleView<'a> {
    fn new(record: &'a NormalizedRecord) -> Self {
        Self {
            record,
            href: web_link_or(&record.url, "#"),
            image_src: web_link_or(&record.url_to_image, DEFAULT_IMAGE),
        }
    }
}

/// `link` if it is an absolute `http`/`https` URL, otherwise `fallback`.
fn web_link_or<'a>(link: &'a str, fallback: &'a str) -> &'a str {
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => link,
        _ => fallback,
    }
}

/// Renders [`SearchPage`]s to HTML.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Compile the page template.
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(INDEX, INDEX_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// Render one page to a complete HTML document.
    pub fn render(&self, page: &SearchPage) -> Result<String, RenderError> {
        self.registry.render(INDEX, &PageView::new(page))
    }
}

/// Render a page and write it to `{output_dir}/{slug}_p{page}.html`.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(%output_dir, query = %page.query, page = page.page))]
pub async fn write_page(
    renderer: &PageRenderer,
    page: &SearchPage,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let html = renderer.render(page)?;
    let path = Path::new(output_dir)
        .join(format!("{}.html", page_file_stem(&page.query, page.page)))
        .to_string_lossy()
        .into_owned();

    fs::write(&path, html).await?;
    info!(%path, articles = page.articles.len(), "Wrote HTML page");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NormalizedRecord, SearchRequest};

    fn page(query: &str, number: i64, articles: Vec<NormalizedRecord>) -> SearchPage {
        SearchPage::new(SearchRequest::new(Some(query), number), articles)
    }

    #[test]
    fn test_template_compiles() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_renders_empty_page() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&page("tecnologia", 1, vec![])).unwrap();

        assert!(html.contains("Notizie: tecnologia"));
        assert!(html.contains("Nessun articolo trovato."));
        assert!(!html.contains("rel=\"prev\""));
        assert!(html.contains("href=\"tecnologia_p2.html\""));
    }

    #[test]
    fn test_renders_articles() {
        let record = NormalizedRecord {
            title: "Nuovo chip".to_string(),
            author: "Mario Rossi".to_string(),
            source_name: "Il Post".to_string(),
            url: "https://example.com/chip".to_string(),
            ..NormalizedRecord::default()
        };
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&page("chip", 3, vec![record])).unwrap();

        assert!(html.contains("Nuovo chip"));
        assert!(html.contains("Mario Rossi"));
        assert!(html.contains("Il Post"));
        assert!(html.contains("No description available"));
        assert!(html.contains("<a href=\"https://example.com/chip\""));
        assert!(html.contains("href=\"chip_p2.html\""));
        assert!(html.contains("href=\"chip_p4.html\""));
        assert!(!html.contains("Nessun articolo trovato."));
    }

    #[test]
    fn test_escapes_upstream_text() {
        let record = NormalizedRecord {
            title: "<script>alert(1)</script>".to_string(),
            ..NormalizedRecord::default()
        };
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&page("<b>", 1, vec![record])).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_web_link_or() {
        assert_eq!(web_link_or("https://example.com/a?b=c", "#"), "https://example.com/a?b=c");
        assert_eq!(web_link_or("http://example.com", "#"), "http://example.com");
        assert_eq!(web_link_or("javascript:alert(1)", "#"), "#");
        assert_eq!(web_link_or(" JavaScript:alert(1)", "#"), "#");
        assert_eq!(web_link_or("data:text/html,<b>x</b>", "#"), "#");
        assert_eq!(web_link_or("/relative/path", "#"), "#");
        assert_eq!(web_link_or("#", "#"), "#");
    }

    #[test]
    fn test_script_urls_are_not_linked() {
        let record = NormalizedRecord {
            title: "Trappola".to_string(),
            url: "javascript:alert(document.cookie)".to_string(),
            url_to_image: "javascript:alert(2)".to_string(),
            ..NormalizedRecord::default()
        };
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&page("chip", 1, vec![record])).unwrap();

        assert!(!html.contains("javascript:"));
        assert!(html.contains("<a href=\"#\""));
        assert!(html.contains("placehold.co"));
    }

    #[tokio::test]
    async fn test_write_page_with_long_query() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let renderer = PageRenderer::new().unwrap();
        let query = "intelligenza ".repeat(25);

        let path = write_page(&renderer, &page(&query, 1, vec![]), dir)
            .await
            .unwrap();

        assert!(std::path::Path::new(&path).exists());
        assert!(path.ends_with("_p1.html"));
    }

    #[tokio::test]
    async fn test_write_page() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let renderer = PageRenderer::new().unwrap();

        let path = write_page(&renderer, &page("rust lang", 2, vec![]), dir)
            .await
            .unwrap();

        assert!(path.ends_with("rust-lang_p2.html"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("href=\"rust-lang_p1.html\""));
    }
}

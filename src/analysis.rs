use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

use crate::content::{
    analyze_content, image_summary, images, keyword_in_introduction, ContentAnalysis, ImageInfo,
    ImageSummary,
};
use crate::error::{AppError, Result};
use crate::extract::extract_main_text;
use crate::fetcher::fetch_html;
use crate::headings::{analyze_headings, heading_hierarchy, headings, HeadingAnalysis, HeadingHierarchy};
use crate::meta::{
    analyze_title, canonical_url, has_breadcrumbs, has_structured_data, meta_description, meta_tags,
    robots_meta, tags_with_prefix, title, MetaTag, TitleAnalysis,
};
use crate::metrics::{contains_keyword, count_keyword, flesch_reading_ease, keyword_density, word_count};
use crate::slug::{analyze_slug, SlugAnalysis};

// Create static selectors to avoid recompiling them each time
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1").expect("Failed to parse h1 selector")
});

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to parse anchor selector")
});

/// On-page SEO signals for one URL and keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub title: String,
    pub meta_description: String,
    pub h1_tags: Vec<String>,
    pub keyword_count: usize,
    pub keyword_density: f64,
    pub readability_score: f64,
    pub internal_links: usize,
    pub external_links: usize,
    pub keyword_in_url: bool,
    pub keyword_in_headings: usize,
    pub word_count: usize,
    pub keyword_in_title: bool,
    pub title_analysis: TitleAnalysis,
    pub heading_analysis: HeadingAnalysis,
    pub title_hierarchy_analysis: HeadingHierarchy,
    pub meta_tags: Vec<MetaTag>,
    pub open_graph_tags: Vec<MetaTag>,
    pub twitter_tags: Vec<MetaTag>,
    pub canonical_url: Option<String>,
    pub robots_meta: Option<String>,
    pub schema_presence: bool,
    pub breadcrumbs: bool,
    pub keyword_in_introduction: bool,
    pub content_analysis: ContentAnalysis,
    pub images: ImageSummary,
    pub seo_images: Vec<ImageInfo>,
    pub slug: Option<SlugAnalysis>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

/// Fetches `url` and analyzes it for `keyword`.
pub async fn analyze(client: &Client, url: &str, keyword: &str) -> Result<AnalysisResult> {
    let fetch_start = Instant::now();
    let html = fetch_html(client, url).await?;
    info!(url, bytes = html.len(), elapsed = ?fetch_start.elapsed(), "fetched page");

    // Parsing and scoring are CPU bound; keep them off the async workers.
    let url = url.to_string();
    let keyword = keyword.to_string();
    tokio::task::spawn_blocking(move || analyze_html(&url, &keyword, &html))
        .await
        .map_err(|e| AppError::AnalysisError(format!("analysis task failed: {}", e)))?
}

/// Analyzes an already fetched document. `url` is the address it was fetched from.
pub fn analyze_html(url: &str, keyword: &str, html: &str) -> Result<AnalysisResult> {
    let base_url = Url::parse(url).ok().map(|_| url);
    let main_text = extract_main_text(html, base_url).unwrap_or_default();
    if main_text.is_empty() {
        debug!(url, "no main content extracted");
    }

    let document = Html::parse_document(html);
    analyze_document(url, keyword, &document, &main_text)
}

/// Builds the report from a parsed document and its extracted main text.
pub fn analyze_document(
    url: &str,
    keyword: &str,
    document: &Html,
    main_text: &str,
) -> Result<AnalysisResult> {
    let title = title(document);
    let meta_description = meta_description(document)?;
    let h1_tags: Vec<String> = document
        .select(&H1_SELECTOR)
        .map(|h1| h1.text().collect())
        .collect();

    let keyword_count = count_keyword(main_text, keyword);
    let total_words = word_count(main_text);
    let links = count_links(document, url);

    let all_headings = headings(document);
    let heading_analysis = analyze_headings(&all_headings, keyword);
    let title_analysis = analyze_title(&title, keyword);

    let tags = meta_tags(document);
    let seo_images = images(document);

    Ok(AnalysisResult {
        keyword_count,
        keyword_density: keyword_density(keyword_count, total_words),
        readability_score: flesch_reading_ease(main_text),
        internal_links: links.internal,
        external_links: links.external,
        keyword_in_url: contains_keyword(url, keyword),
        keyword_in_headings: heading_analysis.with_keyword(),
        word_count: total_words,
        keyword_in_title: title_analysis.contains_keyword,
        title_analysis,
        heading_analysis,
        title_hierarchy_analysis: heading_hierarchy(all_headings),
        open_graph_tags: tags_with_prefix(&tags, "og:"),
        twitter_tags: tags_with_prefix(&tags, "twitter:"),
        meta_tags: tags,
        canonical_url: canonical_url(document),
        robots_meta: robots_meta(document),
        schema_presence: has_structured_data(document),
        breadcrumbs: has_breadcrumbs(document),
        keyword_in_introduction: keyword_in_introduction(document, keyword),
        content_analysis: analyze_content(document, main_text),
        images: image_summary(&seo_images),
        seo_images,
        slug: analyze_slug(url, keyword),
        title,
        meta_description,
        h1_tags,
    })
}

/// Root-relative hrefs are internal; absolute http(s) hrefs outside `url` are external.
pub fn count_links(document: &Html, url: &str) -> LinkCounts {
    let mut counts = LinkCounts::default();
    for href in document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
    {
        if href.starts_with('/') {
            counts.internal += 1;
        } else if href.starts_with("http") && !href.starts_with(url) {
            counts.external += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{NO_META_DESCRIPTION, NO_TITLE};

    const URL: &str = "https://example.com/hello-page";

    fn report(html: &str, keyword: &str, main_text: &str) -> AnalysisResult {
        analyze_document(URL, keyword, &Html::parse_document(html), main_text).unwrap()
    }

    #[test]
    fn basic_page() {
        let html = r#"<html><head><title>Hello</title>
            <meta name="description" content="d"></head>
            <body><h1>Hello World</h1><p>test hello</p></body></html>"#;

        let result = report(html, "hello", "Hello World test hello");
        assert_eq!(result.title, "Hello");
        assert_eq!(result.meta_description, "d");
        assert_eq!(result.h1_tags, vec!["Hello World".to_string()]);
        assert_eq!(result.keyword_count, 2);
        assert_eq!(result.word_count, 4);
        assert_eq!(result.keyword_density, 50.0);
        assert_eq!(result.keyword_in_headings, 1);
        assert!(result.keyword_in_url);
        assert!(result.keyword_in_title);
        assert_eq!(result.title_analysis.keyword_position, 1);
    }

    #[test]
    fn sentinels_when_tags_missing() {
        let result = report("<html><body><p>text</p></body></html>", "title", "text");
        assert_eq!(result.title, NO_TITLE);
        assert_eq!(result.meta_description, NO_META_DESCRIPTION);
        assert!(result.h1_tags.is_empty());
        assert!(!result.keyword_in_title);
    }

    #[test]
    fn meta_description_without_content_is_an_error() {
        let err = analyze_html(URL, "rust", r#"<meta name="description">"#).unwrap_err();
        assert!(matches!(err, AppError::AnalysisError(_)));
        assert!(err.to_string().starts_with("An error occurred: "));
    }

    #[test]
    fn empty_main_text_has_zero_density() {
        let result = report("<html><body></body></html>", "menu", "");
        assert_eq!(result.word_count, 0);
        assert_eq!(result.keyword_count, 0);
        assert_eq!(result.keyword_density, 0.0);
        assert_eq!(result.readability_score, 0.0);
    }

    #[test]
    fn page_without_readable_text_has_zero_density() {
        let result = analyze_html(URL, "x", "<html><body><script>var x = 1;</script></body></html>").unwrap();
        assert_eq!(result.word_count, 0);
        assert_eq!(result.keyword_density, 0.0);
    }

    #[test]
    fn links_are_classified_by_prefix() {
        let html = r#"<body>
            <a href="/about">about</a>
            <a href="/contact">contact</a>
            <a href="https://example.com/hello-page#top">self</a>
            <a href="https://other.org/">other</a>
            <a href="http://insecure.net">insecure</a>
            <a href="relative/path">relative</a>
            <a href="mailto:me@example.com">mail</a>
            <a>no href</a>
        </body>"#;

        let result = report(html, "x", "");
        assert_eq!(result.internal_links, 2);
        assert_eq!(result.external_links, 2);
        assert!(result.internal_links + result.external_links <= 7);
    }

    #[test]
    fn same_site_links_outside_the_input_url_are_external() {
        let document = Html::parse_document(r#"<a href="https://example.com/other">x</a>"#);
        let counts = count_links(&document, URL);
        assert_eq!(counts, LinkCounts { internal: 0, external: 1 });
    }

    #[test]
    fn headings_are_matched_case_insensitively() {
        let html = r#"<body>
            <h1>RUST guide</h1>
            <h2>Why rust?</h2>
            <h3>Other topics</h3>
            <h4>Rust at level four is ignored</h4>
        </body>"#;

        let result = report(html, "Rust", "");
        assert_eq!(result.keyword_in_headings, 2);
        assert_eq!(result.heading_analysis.h2.with_keyword, 1);
        assert_eq!(result.title_hierarchy_analysis.headings.len(), 4);
        assert!(result.title_hierarchy_analysis.hierarchy_issues.is_empty());
    }

    #[test]
    fn keyword_in_url_ignores_case() {
        let result = analyze_document("https://Example.com/RUST-Tips", "rust", &Html::parse_document("<p>x</p>"), "x")
            .unwrap();
        assert!(result.keyword_in_url);

        let result = analyze_document("https://example.com/go-tips", "rust", &Html::parse_document("<p>x</p>"), "x")
            .unwrap();
        assert!(!result.keyword_in_url);
    }

    #[test]
    fn head_and_body_signals() {
        let html = r#"<html><head>
            <link rel="canonical" href="https://example.com/canonical">
            <meta name="robots" content="noindex, follow">
            <meta property="og:title" content="Charts">
            <script type="application/ld+json">{"@type": "Article"}</script>
        </head><body>
            <nav aria-label="Breadcrumb"><a href="/">Home</a></nav>
            <p>Charts explained.</p>
            <img src="a.png" alt="A chart">
            <img src="b.webp" alt=" ">
        </body></html>"#;

        let result = report(html, "chart", "Charts explained.");
        assert_eq!(result.canonical_url.as_deref(), Some("https://example.com/canonical"));
        assert_eq!(result.robots_meta.as_deref(), Some("noindex, follow"));
        assert!(result.schema_presence);
        assert!(result.breadcrumbs);
        assert!(result.keyword_in_introduction);
        assert_eq!(result.open_graph_tags.len(), 1);
        assert!(result.twitter_tags.is_empty());
        assert_eq!(result.meta_tags.len(), 2);
        assert_eq!(result.images, ImageSummary { total: 2, with_alt: 1, without_alt: 1 });
        assert!(result.seo_images[1].web_optimized);
        assert_eq!(result.content_analysis.paragraph_count, 1);
        assert_eq!(result.slug.unwrap().slug, "hello-page");
    }

    #[test]
    fn extracts_article_text_for_metrics() {
        let story = "Rust gives systems programmers memory safety without a garbage collector, \
            and the borrow checker enforces it at compile time. Teams adopting it report fewer \
            production crashes, clearer ownership of data, and a compiler that explains its \
            complaints in plain language.";
        let html = format!(
            r#"<html><head><title>Notes</title></head><body>
                <nav><a href="/">Home</a> <a href="/widgets">Widgets</a></nav>
                <article><p>{story}</p><p>{story}</p><p>{story}</p></article>
                <footer>Widgets and more widgets</footer>
            </body></html>"#
        );

        let result = analyze_html(URL, "widgets", &html).unwrap();
        assert_eq!(result.keyword_count, 0);
        assert!(result.word_count > 0);

        let result = analyze_html(URL, "rust", &html).unwrap();
        assert_eq!(result.keyword_count, 3);
    }

    #[test]
    fn serializes_flat_record() {
        let result = report("<title>Hello</title><h1>Hello</h1>", "hello", "Hello");
        let json = serde_json::to_value(&result).unwrap();
        for field in [
            "title",
            "meta_description",
            "h1_tags",
            "keyword_count",
            "keyword_density",
            "readability_score",
            "internal_links",
            "external_links",
            "keyword_in_url",
            "keyword_in_headings",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert!(json.get("error").is_none());
    }
}
